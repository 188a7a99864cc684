//! Plain-text estimate for printing or pasting into an offer.

use crate::error::ExportError;
use crate::model::{AnalysisOutcome, EstimateTotals, SheetResult};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn money(value: f64) -> String {
    format!("{value:.2} zł")
}

fn item_line(item: &SheetResult) -> String {
    let name = item.material_name.as_deref().unwrap_or("-");
    let amount = match (&item.advisory, item.cost()) {
        (Some(advisory), _) => format!("[{advisory}]"),
        (None, Some(cost)) => money(cost),
        (None, None) => "-".to_string(),
    };

    if item.is_hardware {
        format!(
            "  {:<14} {:<40} {:>6} szt. {:>14}",
            item.sku, name, item.sheets_needed, amount
        )
    } else {
        format!(
            "  {:<14} {:<40} {:>6} ark. {:>14}  ({:.2} m², {}%)",
            item.sku,
            name,
            item.sheets_needed,
            amount,
            item.total_area_mm2 / 1_000_000.0,
            item.utilization_percent()
        )
    }
}

/// Renders the estimate. Markup and assembly lines appear only when non-zero.
#[must_use]
pub fn render_summary(outcome: &AnalysisOutcome, totals: &EstimateTotals) -> String {
    let mut out = String::new();

    if let Some(error) = &outcome.error {
        let _ = writeln!(out, "Analysis failed: {error}");
        return out;
    }

    let (hardware, boards): (Vec<&SheetResult>, Vec<&SheetResult>) =
        outcome.sheets.iter().partition(|i| i.is_hardware);

    let _ = writeln!(out, "Board materials ({} sheets)", totals.total_sheets);
    for item in &boards {
        let _ = writeln!(out, "{}", item_line(item));
    }

    if !hardware.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Hardware ({} pieces)", totals.total_pieces);
        for item in &hardware {
            let _ = writeln!(out, "{}", item_line(item));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Materials:        {:>14}", money(totals.materials));
    if totals.markup_percent != 0.0 {
        let _ = writeln!(
            out,
            "Markup {:>5.1}%:    {:>14}",
            totals.markup_percent,
            money(totals.markup_amount)
        );
    }
    if totals.assembly_percent != 0.0 {
        let _ = writeln!(
            out,
            "Assembly {:>5.1}%:  {:>14}",
            totals.assembly_percent,
            money(totals.assembly_amount)
        );
    }
    let _ = writeln!(out, "Total:            {:>14}", money(totals.grand_total));

    let unresolved = outcome.sheets.iter().filter(|i| i.advisory.is_some()).count();
    if unresolved > 0 {
        let _ = writeln!(out, "\n{unresolved} item(s) need a manual price.");
    }

    out
}

pub fn export_summary<P: AsRef<Path>>(
    outcome: &AnalysisOutcome,
    totals: &EstimateTotals,
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let text = render_summary(outcome, totals);

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(text.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Advisory, Diagnostics, LineElement};
    use pretty_assertions::assert_eq;

    fn outcome() -> AnalysisOutcome {
        let mut board = SheetResult::sheet(
            "W980",
            vec![LineElement::new("Bok - D60", 510.0, 720.0, 2, Some("D60"))],
        );
        board.unit_price = Some(300.0);
        board.material_name = Some("Biały platynowy".to_string());

        let mut handle = SheetResult::hardware(
            "NIEZNANY",
            "Uchwyt meblowy - D60",
            vec![LineElement::new("Uchwyt meblowy - D60", 0.0, 0.0, 1, Some("D60"))],
        );
        handle.advisory = Some(Advisory::UnknownMaterial {
            sku: "NIEZNANY".to_string(),
        });

        AnalysisOutcome::succeeded(vec![board, handle], Diagnostics::new())
    }

    #[test]
    fn test_summary_without_rates() {
        let outcome = outcome();
        let totals = EstimateTotals::compute(&outcome.sheets, 0.0, 0.0);
        let text = render_summary(&outcome, &totals);

        assert!(text.contains("Board materials (1 sheets)"));
        assert!(text.contains("Biały platynowy"));
        assert!(text.contains("[unknown material: NIEZNANY]"));
        assert!(text.contains("300.00 zł"));
        assert!(!text.contains("Markup"));
        assert!(!text.contains("Assembly"));
        assert!(text.contains("1 item(s) need a manual price."));
    }

    #[test]
    fn test_summary_with_rates() {
        let outcome = outcome();
        let totals = EstimateTotals::compute(&outcome.sheets, 10.0, 20.0);
        let text = render_summary(&outcome, &totals);

        assert!(text.contains("Markup"));
        assert!(text.contains("30.00 zł"));
        assert!(text.contains("Assembly"));
        assert!(text.contains("66.00 zł"));
        assert!(text.contains("396.00 zł"));
    }

    #[test]
    fn test_summary_failure() {
        let outcome = AnalysisOutcome::failed("no JSON array found in response");
        let text = render_summary(&outcome, &EstimateTotals::default());
        assert_eq!(text, "Analysis failed: no JSON array found in response\n");
    }
}
