use crate::error::ExportError;
use crate::model::SheetResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 9] = [
    "SKU",
    "Material",
    "Component",
    "Hardware",
    "Area m2",
    "Quantity",
    "Unit price",
    "Total",
    "Advisory",
];

fn price(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.2}"))
}

/// One row per line item.
pub fn write_csv<W: Write>(items: &[SheetResult], writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(HEADER)?;

    for item in items {
        writer.write_record([
            item.sku.clone(),
            item.material_name.clone().unwrap_or_default(),
            item.component().unwrap_or_default().to_string(),
            if item.is_hardware { "yes" } else { "no" }.to_string(),
            format!("{:.3}", item.total_area_mm2 / 1_000_000.0),
            item.sheets_needed.to_string(),
            price(item.unit_price),
            price(item.cost()),
            item.advisory.as_ref().map(ToString::to_string).unwrap_or_default(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

pub fn export_csv<P: AsRef<Path>>(items: &[SheetResult], path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    write_csv(items, file)
}
