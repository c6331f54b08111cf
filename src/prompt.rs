//! Interactive single-choice prompt for the capture label.
//!
//! Presents the enumerated label set and blocks for one selection. Aborted
//! input (EOF) or an invalid selection fails fast; the workflow never runs
//! with an undefined label.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};

/// Prompt on stderr, read the selection from stdin.
pub fn choose_label(choices: &[String]) -> Result<String> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stderr();
    choose_label_from(&mut input, &mut output, choices)
}

/// Testable core: prompt over arbitrary reader/writer pairs.
pub fn choose_label_from<R, W>(input: &mut R, output: &mut W, choices: &[String]) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    if choices.is_empty() {
        return Err(anyhow!("no labels to choose from"));
    }

    writeln!(output, "What data do you want to collect?")?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, choice)?;
    }
    write!(output, "selection [1-{}]: ", choices.len())?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("read selection")?;
    if read == 0 {
        return Err(anyhow!("selection aborted"));
    }

    let trimmed = line.trim();
    let choice: usize = trimmed
        .parse()
        .map_err(|_| anyhow!("invalid selection {:?}", trimmed))?;
    if choice == 0 || choice > choices.len() {
        return Err(anyhow!(
            "selection {} out of range 1-{}",
            choice,
            choices.len()
        ));
    }
    Ok(choices[choice - 1].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn choices() -> Vec<String> {
        vec!["with_mask".to_string(), "without_mask".to_string()]
    }

    #[test]
    fn returns_selected_label() -> Result<()> {
        let mut out = Vec::new();
        let label = choose_label_from(&mut Cursor::new("2\n"), &mut out, &choices())?;
        assert_eq!(label, "without_mask");
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("1) with_mask"));
        assert!(rendered.contains("2) without_mask"));
        Ok(())
    }

    #[test]
    fn tolerates_surrounding_whitespace() -> Result<()> {
        let mut out = Vec::new();
        let label = choose_label_from(&mut Cursor::new("  1  \n"), &mut out, &choices())?;
        assert_eq!(label, "with_mask");
        Ok(())
    }

    #[test]
    fn aborted_input_fails_fast() {
        let mut out = Vec::new();
        assert!(choose_label_from(&mut Cursor::new(""), &mut out, &choices()).is_err());
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        let mut out = Vec::new();
        assert!(choose_label_from(&mut Cursor::new("0\n"), &mut out, &choices()).is_err());
        assert!(choose_label_from(&mut Cursor::new("3\n"), &mut out, &choices()).is_err());
        assert!(choose_label_from(&mut Cursor::new("mask\n"), &mut out, &choices()).is_err());
    }

    #[test]
    fn rejects_empty_choice_list() {
        let mut out = Vec::new();
        assert!(choose_label_from(&mut Cursor::new("1\n"), &mut out, &[]).is_err());
    }
}
