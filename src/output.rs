//! Terminal rendering of transcription results.
//! Used by the console sink and by `streamscribe inspect`.

use crate::results::{TranscriptionResult, UnstructuredReason};
use crate::session::ReceiveEnd;
use owo_colors::{OwoColorize, Style};
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

fn paint(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format seconds with two decimals and a unit, e.g. `1.50s`.
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

/// Render one result.
///
/// Transcripts get a banner with text, duration and numbered segments in the
/// order received; errors and raw payloads get a single line.
pub fn render_result<W: Write>(
    out: &mut W,
    result: &TranscriptionResult,
    color: bool,
) -> io::Result<()> {
    match result {
        TranscriptionResult::Error { message } => {
            writeln!(
                out,
                "{} {}",
                paint("Error:", Style::new().red().bold(), color),
                message
            )
        }
        TranscriptionResult::Transcript(transcript) => {
            let rule = "=".repeat(RULE_WIDTH);
            writeln!(out)?;
            writeln!(out, "{}", rule)?;
            writeln!(
                out,
                "{}",
                paint("Transcription Result:", Style::new().green().bold(), color)
            )?;
            writeln!(out, "{}", rule)?;
            writeln!(out, "Text: {}", transcript.text)?;
            let duration = transcript
                .duration
                .map(format_seconds)
                .unwrap_or_else(|| "N/A".to_string());
            writeln!(out, "Duration: {}", duration)?;
            if let Some(message) = &transcript.message {
                writeln!(out, "Note: {}", message)?;
            }

            if !transcript.segments.is_empty() {
                writeln!(out)?;
                writeln!(out, "Segments:")?;
                for (i, segment) in transcript.segments.iter().enumerate() {
                    let span = format!(
                        "[{} - {}]",
                        format_seconds(segment.start),
                        format_seconds(segment.end)
                    );
                    writeln!(
                        out,
                        "  {}. {} {}",
                        i + 1,
                        paint(&span, Style::new().dimmed(), color),
                        segment.text
                    )?;
                }
            }
            writeln!(out, "{}", rule)
        }
        TranscriptionResult::Unstructured { raw, reason } => {
            let label = match reason {
                UnstructuredReason::InvalidJson => "Invalid JSON:",
                UnstructuredReason::UnrecognizedShape => "Received:",
            };
            writeln!(
                out,
                "{} {}",
                paint(label, Style::new().yellow(), color),
                raw
            )
        }
    }
}

/// Render how the receive flow ended.
pub fn render_end<W: Write>(out: &mut W, end: &ReceiveEnd, color: bool) -> io::Result<()> {
    match end {
        ReceiveEnd::TimedOut => writeln!(
            out,
            "{}",
            paint("Timeout waiting for results", Style::new().yellow(), color)
        ),
        ReceiveEnd::PeerClosed => writeln!(
            out,
            "{}",
            paint("Connection closed by server", Style::new().dimmed(), color)
        ),
        ReceiveEnd::TransportFailed(message) => writeln!(
            out,
            "{} {}",
            paint("Receive failed:", Style::new().red(), color),
            message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::decode;

    fn render(result: &TranscriptionResult) -> String {
        let mut buf = Vec::new();
        render_result(&mut buf, result, false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn renders_error_line() {
        let text = render(&decode(r#"{"error": "bad audio"}"#));
        assert_eq!(text, "Error: bad audio\n");
    }

    #[test]
    fn renders_transcript_with_segments() {
        let text = render(&decode(
            r#"{"transcription": "hello world", "duration": 2.5, "segments": [
                {"start": 0.0, "end": 1.2, "text": "hello"},
                {"start": 1.2, "end": 2.5, "text": "world"}
            ]}"#,
        ));

        assert!(text.contains("Transcription Result:"));
        assert!(text.contains("Text: hello world\n"));
        assert!(text.contains("Duration: 2.50s\n"));
        assert!(text.contains("  1. [0.00s - 1.20s] hello\n"));
        assert!(text.contains("  2. [1.20s - 2.50s] world\n"));
        assert!(text.find("1. [").unwrap() < text.find("2. [").unwrap());
        assert!(text.ends_with(&format!("{}\n", "=".repeat(60))));
    }

    #[test]
    fn renders_missing_duration_as_na() {
        let text = render(&decode(r#"{"transcription": "hi"}"#));
        assert!(text.contains("Duration: N/A\n"));
        assert!(!text.contains("Segments:"));
    }

    #[test]
    fn renders_note_for_no_speech() {
        let text = render(&decode(
            r#"{"transcription": "", "message": "No speech detected", "duration": 1.0}"#,
        ));
        assert!(text.contains("Note: No speech detected\n"));
    }

    #[test]
    fn renders_unstructured_by_reason() {
        assert_eq!(render(&decode("hello?")), "Invalid JSON: hello?\n");
        assert_eq!(
            render(&decode(r#"{"status":"ok"}"#)),
            "Received: {\"status\":\"ok\"}\n"
        );
    }

    #[test]
    fn colored_output_contains_escape_codes() {
        let mut buf = Vec::new();
        render_result(&mut buf, &decode(r#"{"error": "x"}"#), true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('\x1b'));
        assert!(text.contains("x"));
    }

    #[test]
    fn renders_receive_ends() {
        let render_end_str = |end: ReceiveEnd| {
            let mut buf = Vec::new();
            render_end(&mut buf, &end, false).unwrap();
            String::from_utf8(buf).unwrap()
        };

        assert_eq!(
            render_end_str(ReceiveEnd::TimedOut),
            "Timeout waiting for results\n"
        );
        assert_eq!(
            render_end_str(ReceiveEnd::PeerClosed),
            "Connection closed by server\n"
        );
        assert_eq!(
            render_end_str(ReceiveEnd::TransportFailed("reset".to_string())),
            "Receive failed: reset\n"
        );
    }

    #[test]
    fn format_seconds_uses_two_decimals() {
        assert_eq!(format_seconds(1.5), "1.50s");
        assert_eq!(format_seconds(0.0), "0.00s");
        assert_eq!(format_seconds(12.346), "12.35s");
    }
}
