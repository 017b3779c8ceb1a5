use std::io::Write;

use crate::error::CliError;

/// Writes the rendered report followed by a newline.
pub fn render(report: &str) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report)
}

fn write_report<W: Write>(out: &mut W, report: &str) -> Result<(), CliError> {
    writeln!(out, "{report}")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_is_written_with_trailing_newline() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, "{}").expect("in-memory write");
        assert_eq!(buffer, b"{}\n");
    }
}
