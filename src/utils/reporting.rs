use std::path::Path;
use csv::Writer;
use crate::utils::batch::BatchSummary;
use crate::Result;

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// One row per input file: `input,output,status,error`.
    pub fn generate_batch_report(&self, summary: &BatchSummary, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path_ref = output_path.as_ref();
        let mut writer = Writer::from_path(output_path_ref)?;

        for outcome in &summary.outcomes {
            writer.serialize(outcome)?;
        }

        writer.flush()?;
        println!("Report generated: {}", output_path_ref.display());
        Ok(())
    }

    pub fn print_summary(&self, summary: &BatchSummary) {
        use crate::utils::batch::Status;
        println!(
            "processed {} files: {} ok, {} failed, {} skipped",
            summary.outcomes.len(),
            summary.count(Status::Ok),
            summary.count(Status::Failed),
            summary.count(Status::Skipped),
        );
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
