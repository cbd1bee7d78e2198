//! Interactive shell: reads one script per line from stdin, runs it and
//! prints the outcome of each statement.
//!
//! An optional first argument names a script file to run before reading stdin.
//! Log verbosity follows `RUST_LOG` (default `warn`).

use std::io::{self, BufRead, Write};
use std::{env, fs, process};

use tinysql::{Database, Outcome, ResultSet};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MIN_CELL_WIDTH: usize = 10;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut db = Database::new();

    if let Some(path) = env::args().nth(1) {
        let script = match fs::read_to_string(&path) {
            Ok(script) => script,
            Err(e) => {
                error!("failed to read {path}: {e}");
                process::exit(1);
            }
        };
        info!(path = %path, "running script");
        print!("{}", run_script(&mut db, &script));
    }

    if let Err(e) = repl(&mut db) {
        error!("i/o error: {e}");
        process::exit(1);
    }
}

fn repl(db: &mut Database) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "$ ")?;
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(stdout)?;
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        write!(stdout, "{}", run_script(db, &line))?;
    }
}

/// Runs a script and renders what it produced. A failure is rendered too;
/// it never stops the shell.
fn run_script(db: &mut Database, script: &str) -> String {
    match db.run(script) {
        Ok(outcomes) => outcomes.iter().map(render_outcome).collect(),
        Err(e) => format!("error: {e}\n"),
    }
}

fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created | Outcome::Inserted => "ok\n".to_string(),
        Outcome::Selected(result) => render_result(result),
    }
}

/// Renders a result set as a `|`-separated table: a header row of column
/// names, one line per row, then the row count.
fn render_result(result: &ResultSet) -> String {
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain([col.name.chars().count(), MIN_CELL_WIDTH])
                .max()
                .unwrap_or(MIN_CELL_WIDTH)
        })
        .collect();

    let mut out = render_line(result.columns.iter().map(|col| col.name.as_str()), &widths);
    for row in &cells {
        out.push_str(&render_line(row.iter().map(String::as_str), &widths));
    }
    let count = result.rows.len();
    out.push_str(&format!("({count} {})\n", if count == 1 { "row" } else { "rows" }));
    out
}

fn render_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut out = String::from("|");
    for (value, &width) in values.zip(widths) {
        out.push_str(&format!("{value:>width$}|"));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_result() {
        let mut db = Database::new();
        let out = run_script(
            &mut db,
            "CREATE TABLE users (id INT, name TEXT); \
             INSERT INTO users VALUES (1, 'Alice'); \
             SELECT id, name FROM users;",
        );

        assert_eq!(
            out,
            "ok\nok\n\
             |        id|      name|\n\
             |         1|     Alice|\n\
             (1 row)\n"
        );
    }

    #[test]
    fn test_render_wide_cells() {
        let mut db = Database::new();
        let out = run_script(
            &mut db,
            "CREATE TABLE t (description TEXT); \
             INSERT INTO t VALUES ('a rather long value'); \
             INSERT INTO t VALUES ('short'); \
             SELECT description FROM t;",
        );

        let expected = format!(
            "|{:>19}|\n|{:>19}|\n|{:>19}|\n(2 rows)\n",
            "description", "a rather long value", "short"
        );
        assert!(out.ends_with(&expected), "{out}");
    }

    #[test]
    fn test_errors_are_rendered() {
        let mut db = Database::new();
        let out = run_script(&mut db, "SELECT id FROM missing;");
        assert_eq!(
            out,
            "error: execution error: table \"missing\" does not exist\n"
        );
    }
}
