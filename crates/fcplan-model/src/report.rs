use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use crate::plan::Plan;
use crate::workbook::write_label;

pub const SUMMARY_SHEET: &str = "Summary";
pub const SOLUTION_SHEET: &str = "Solution";
pub const CAPACITY_SHEET: &str = "Capacity Constraints";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot write report: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Write the Summary, Solution and Capacity Constraints sheets.
pub fn write_report(plan: &Plan, path: &Path) -> Result<(), ReportError> {
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET)?;
    summary.write_string(0, 0, "Objective Value")?;
    summary.write_number(1, 0, plan.objective_value)?;

    let solution = workbook.add_worksheet();
    solution.set_name(SOLUTION_SHEET)?;
    for (col, header) in ["FC_name", "region_ID", "item_ID", "shipment"].iter().enumerate() {
        solution.write_string(0, col as u16, *header)?;
    }
    for (r, shipment) in plan.shipments.iter().enumerate() {
        let row = r as u32 + 1;
        write_label(solution, row, 0, &shipment.fc)?;
        write_label(solution, row, 1, &shipment.region)?;
        write_label(solution, row, 2, &shipment.item)?;
        solution.write_number(row, 3, shipment.quantity)?;
    }

    let capacity = workbook.add_worksheet();
    capacity.set_name(CAPACITY_SHEET)?;
    capacity.write_string(0, 0, "FC_name")?;
    capacity.write_string(0, 1, "shadow_price")?;
    for (r, price) in plan.capacity_shortlist.iter().enumerate() {
        let row = r as u32 + 1;
        write_label(capacity, row, 0, &price.fc)?;
        capacity.write_number(row, 1, price.shadow_price)?;
    }

    workbook.save(path)?;
    Ok(())
}
