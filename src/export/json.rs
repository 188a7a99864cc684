use crate::error::ExportError;
use crate::model::AnalysisOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn export_json<P: AsRef<Path>>(outcome: &AnalysisOutcome, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(outcome)?;

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Diagnostics, LineElement, SheetResult};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_json_shape() {
        let item = SheetResult::sheet("W980", vec![LineElement::new("Bok", 510.0, 720.0, 2, None)]);
        let outcome = AnalysisOutcome::succeeded(vec![item], Diagnostics::new());
        let path = std::env::temp_dir().join(format!("estimate-{}.json", std::process::id()));

        export_json(&outcome, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["sheets"][0]["sku"], "W980");
        assert_eq!(value["sheets"][0]["sheetsNeeded"], 1);
        assert_eq!(value["sheets"][0]["isHardware"], false);
        assert!(value.get("error").is_none());
    }
}
