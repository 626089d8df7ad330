use crate::pipeline::PipelineResult;
use std::fmt;
use unicode_bidi::BidiInfo;

/// Reorder mixed-direction text into visual order so right-to-left trip
/// names read correctly in a left-to-right terminal.
pub fn display_text(text: &str) -> String {
    let bidi_info = BidiInfo::new(text, None);
    let mut out = String::with_capacity(text.len());
    for para in &bidi_info.paragraphs {
        let line = para.range.clone();
        out.push_str(&bidi_info.reorder_line(para, line));
    }
    out
}

/// Human-readable run summary printed on stdout.
pub struct Summary<'a>(pub &'a PipelineResult);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        if let Some(input) = &result.input_file {
            let verb = if result.output_file.is_some() {
                "Converting"
            } else {
                "Reading"
            };
            writeln!(f, "{} {}", verb, input)?;
        }
        writeln!(f, "There are {} trips:", result.trips.len())?;
        for trip in &result.trips {
            writeln!(f, "{}", display_text(trip))?;
        }
        writeln!(
            f,
            "{} people read, {} rows skipped, {} without trips",
            result.people, result.skipped_rows, result.without_trips
        )?;
        if let Some(output) = &result.output_file {
            writeln!(f, "Wrote {} contacts to {}", result.rows_written, output)?;
        }
        Ok(())
    }
}

pub fn render_summary(result: &PipelineResult) -> String {
    Summary(result).to_string()
}
