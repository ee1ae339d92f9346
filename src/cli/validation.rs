use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.endpoint.as_deref() {
        url::Url::parse(raw.trim()).map_err(|e| format!("invalid --url '{raw}': {e}"))?;
    }
    if let Some(batch) = args.batch_size {
        if batch == 0 {
            return Err("invalid batch-size, expected positive integer".to_string());
        }
    }
    if let Some(tolerance) = args.tolerance {
        if tolerance > 1 {
            return Err("invalid tolerance, expected 0 or 1".to_string());
        }
    }
    if let Some(step) = args.scroll_step {
        if step == 0 {
            return Err("invalid scroll-step, expected positive integer".to_string());
        }
    }
    if let Some(viewport) = args.viewport_height {
        if viewport == 0 {
            return Err("invalid viewport-height, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --output-format '{raw}', expected text or json"));
        }
    }
    Ok(())
}
