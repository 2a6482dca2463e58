//! Operator classification prompt
//!
//! One blocking prompt per file mapping a single keystroke to a typed
//! `AspectChoice`. Anything outside the closed option set re-prompts
//! indefinitely; the loop never times out. Generic over the reader/writer so
//! tests can script the operator.

use crate::errors::{Result, SarFixError};
use crate::sar::AspectChoice;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::info;

pub fn classify<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    file: &Path,
) -> Result<AspectChoice> {
    write_menu(output, file).map_err(|e| channel_error(file, e))?;

    loop {
        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| channel_error(file, e))?;
        if bytes == 0 {
            // A closed operator channel would spin the re-prompt loop forever.
            return Err(SarFixError::OperatorChannelClosed(format!(
                "EOF while classifying {}",
                file.display()
            )));
        }

        let answer = line.trim();
        let choice = if answer.chars().count() == 1 {
            answer.chars().next().and_then(AspectChoice::from_key)
        } else {
            None
        };

        match choice {
            Some(choice) => {
                info!("🎯 {} classified as {}", file.display(), choice);
                return Ok(choice);
            }
            None => {
                write!(output, "Invalid choice. Please enter A or B: ")
                    .and_then(|_| output.flush())
                    .map_err(|e| channel_error(file, e))?;
            }
        }
    }
}

fn write_menu<W: Write>(output: &mut W, file: &Path) -> std::io::Result<()> {
    writeln!(output)?;
    writeln!(
        output,
        "📺 Please specify the display aspect ratio for: {}",
        file.display()
    )?;
    writeln!(output, "   A) 4:3")?;
    writeln!(output, "   B) Anamorphic 16:9")?;
    write!(output, "Enter choice (A/B): ")?;
    output.flush()
}

/// Any I/O failure on the prompt streams means the operator interface is
/// gone, which is setup-class: re-prompting cannot recover it.
fn channel_error(file: &Path, e: std::io::Error) -> SarFixError {
    SarFixError::OperatorChannelClosed(format!("{} while classifying {}", e, file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> Result<AspectChoice> {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        classify(&mut reader, &mut out, Path::new("clip.mov"))
    }

    #[test]
    fn test_accepts_both_options_case_insensitive() {
        assert_eq!(run("A\n").unwrap(), AspectChoice::FourByThree);
        assert_eq!(run("a\n").unwrap(), AspectChoice::FourByThree);
        assert_eq!(run("B\n").unwrap(), AspectChoice::SixteenByNine);
        assert_eq!(run("b\n").unwrap(), AspectChoice::SixteenByNine);
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(run("  a  \n").unwrap(), AspectChoice::FourByThree);
    }

    #[test]
    fn test_reprompts_until_valid() {
        let choice = run("x\n\n42\nAB\nb\n").unwrap();
        assert_eq!(choice, AspectChoice::SixteenByNine);
    }

    #[test]
    fn test_multi_letter_input_is_rejected() {
        // "AB" must not silently resolve to option A.
        let choice = run("AB\nBA\nA\n").unwrap();
        assert_eq!(choice, AspectChoice::FourByThree);
    }

    #[test]
    fn test_eof_is_setup_error() {
        let err = run("").unwrap_err();
        assert!(matches!(err, SarFixError::OperatorChannelClosed(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_eof_after_invalid_input_is_setup_error() {
        let err = run("zz\n").unwrap_err();
        assert!(matches!(err, SarFixError::OperatorChannelClosed(_)));
    }

    /// Writer standing in for a torn-down terminal.
    struct BrokenWriter;

    impl std::io::Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            ))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_prompt_stream_is_setup_error() {
        let mut reader = Cursor::new(b"A\n".to_vec());
        let err = classify(&mut reader, &mut BrokenWriter, Path::new("clip.mov")).unwrap_err();
        assert!(matches!(err, SarFixError::OperatorChannelClosed(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_prompt_names_the_file() {
        let mut reader = Cursor::new(b"A\n".to_vec());
        let mut out = Vec::new();
        classify(&mut reader, &mut out, Path::new("tape_07.mov")).unwrap();
        let prompt = String::from_utf8(out).unwrap();
        assert!(prompt.contains("tape_07.mov"));
        assert!(prompt.contains("A) 4:3"));
        assert!(prompt.contains("B) Anamorphic 16:9"));
    }
}
