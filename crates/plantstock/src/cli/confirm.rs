//! Interactive confirmation for destructive commands.

use std::io::{self, BufRead, Write};

/// Ask a yes/no question. Only `y` or `yes` (any case) confirms; end of
/// input counts as no.
pub fn confirm<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }

    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Confirm on the terminal unless `assume_yes` is set.
pub fn confirm_or_yes(prompt: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm(prompt, &mut stdin.lock(), &mut stdout.lock())
}
