//! Input workbook layout.
//!
//! The first sheet lists the FCs (index column plus `capacity`). The other
//! sheets are looked up by name: `Regions`, `Distances` (regions x FCs),
//! `Items` (`shipping_weight`, `storage_size`) and `Demand` (items x regions).
//! Row 0 of every sheet is the header; column 0 holds the row labels.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::debug;

use crate::network::{FulfillmentCenter, Item, Label, LabeledMatrix, Network, Region};

pub const REGIONS_SHEET: &str = "Regions";
pub const DISTANCES_SHEET: &str = "Distances";
pub const ITEMS_SHEET: &str = "Items";
pub const DEMAND_SHEET: &str = "Demand";

pub const CAPACITY_COLUMN: &str = "capacity";
pub const SHIPPING_WEIGHT_COLUMN: &str = "shipping_weight";
pub const STORAGE_SIZE_COLUMN: &str = "storage_size";

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("cannot read workbook: {0}")]
    Read(#[from] calamine::Error),
    #[error("cannot write workbook: {0}")]
    Write(#[from] XlsxError),
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("missing sheet '{0}'")]
    MissingSheet(String),
    #[error("sheet '{0}' has no header row")]
    EmptySheet(String),
    #[error("sheet '{sheet}' has no column '{column}'")]
    MissingColumn { sheet: String, column: String },
    #[error("sheet '{sheet}', row '{row}', column '{column}': expected a number, found '{found}'")]
    NotANumber {
        sheet: String,
        row: Label,
        column: String,
        found: String,
    },
}

/// Read the five input tables from a workbook (xlsx, xls or ods).
pub fn read_network(path: &Path) -> Result<Network, WorkbookError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();
    let first = sheet_names.first().cloned().ok_or(WorkbookError::NoSheets)?;

    let mut load = |name: &str| -> Result<Table, WorkbookError> {
        if !sheet_names.iter().any(|s| s == name) {
            return Err(WorkbookError::MissingSheet(name.to_string()));
        }
        let range = workbook.worksheet_range(name)?;
        Table::from_range(name, &range)
    };

    let fc_table = load(&first)?;
    let capacity = fc_table.column(CAPACITY_COLUMN)?;
    let fcs = fc_table
        .rows
        .iter()
        .map(|row| {
            Ok(FulfillmentCenter {
                name: row.label.clone(),
                capacity: fc_table.number(row, capacity)?,
            })
        })
        .collect::<Result<Vec<_>, WorkbookError>>()?;

    let regions = load(REGIONS_SHEET)?
        .rows
        .into_iter()
        .map(|row| Region { id: row.label })
        .collect::<Vec<_>>();

    let item_table = load(ITEMS_SHEET)?;
    let weight = item_table.column(SHIPPING_WEIGHT_COLUMN)?;
    let size = item_table.column(STORAGE_SIZE_COLUMN)?;
    let items = item_table
        .rows
        .iter()
        .map(|row| {
            Ok(Item {
                id: row.label.clone(),
                shipping_weight: item_table.number(row, weight)?,
                storage_size: item_table.number(row, size)?,
            })
        })
        .collect::<Result<Vec<_>, WorkbookError>>()?;

    let distances = load(DISTANCES_SHEET)?.matrix()?;
    let demand = load(DEMAND_SHEET)?.matrix()?;

    debug!(
        fcs = fcs.len(),
        regions = regions.len(),
        items = items.len(),
        "read input workbook"
    );

    Ok(Network {
        fcs,
        regions,
        items,
        distances,
        demand,
    })
}

/// Write a network in the layout `read_network` expects.
pub fn write_network(network: &Network, path: &Path) -> Result<(), WorkbookError> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("FCs")?;
    sheet.write_string(0, 0, "FC_name")?;
    sheet.write_string(0, 1, CAPACITY_COLUMN)?;
    for (r, fc) in network.fcs.iter().enumerate() {
        let row = r as u32 + 1;
        write_label(sheet, row, 0, &fc.name)?;
        sheet.write_number(row, 1, fc.capacity)?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(REGIONS_SHEET)?;
    sheet.write_string(0, 0, "region_ID")?;
    for (r, region) in network.regions.iter().enumerate() {
        write_label(sheet, r as u32 + 1, 0, &region.id)?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(DISTANCES_SHEET)?;
    write_matrix(sheet, "region_ID", &network.distances)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(ITEMS_SHEET)?;
    sheet.write_string(0, 0, "item_ID")?;
    sheet.write_string(0, 1, SHIPPING_WEIGHT_COLUMN)?;
    sheet.write_string(0, 2, STORAGE_SIZE_COLUMN)?;
    for (r, item) in network.items.iter().enumerate() {
        let row = r as u32 + 1;
        write_label(sheet, row, 0, &item.id)?;
        sheet.write_number(row, 1, item.shipping_weight)?;
        sheet.write_number(row, 2, item.storage_size)?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(DEMAND_SHEET)?;
    write_matrix(sheet, "item_ID", &network.demand)?;

    workbook.save(path)?;
    Ok(())
}

/// Write a label keeping its cell type.
pub(crate) fn write_label(sheet: &mut Worksheet, row: u32, col: u16, label: &Label) -> Result<(), XlsxError> {
    match label {
        Label::Int(i) => sheet.write_number(row, col, *i as f64)?,
        Label::Text(s) => sheet.write_string(row, col, s.as_str())?,
    };
    Ok(())
}

fn write_matrix(sheet: &mut Worksheet, corner: &str, matrix: &LabeledMatrix) -> Result<(), XlsxError> {
    sheet.write_string(0, 0, corner)?;
    for (c, column) in matrix.columns().iter().enumerate() {
        write_label(sheet, 0, c as u16 + 1, column)?;
    }
    for (r, row) in matrix.rows().iter().enumerate() {
        let xl_row = r as u32 + 1;
        write_label(sheet, xl_row, 0, row)?;
        for (c, column) in matrix.columns().iter().enumerate() {
            if let Some(value) = matrix.get(row, column) {
                sheet.write_number(xl_row, c as u16 + 1, value)?;
            }
        }
    }
    Ok(())
}

struct TableRow {
    label: Label,
    cells: Vec<Data>,
}

/// A sheet split into header, row labels and cells
struct Table {
    sheet: String,
    header: Vec<Option<Label>>,
    rows: Vec<TableRow>,
}

impl Table {
    fn from_range(sheet: &str, range: &Range<Data>) -> Result<Self, WorkbookError> {
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| WorkbookError::EmptySheet(sheet.to_string()))?
            .iter()
            .map(cell_label)
            .collect();

        // Rows without a label are blank padding.
        let rows = rows
            .filter_map(|cells| {
                let label = cells.first().and_then(cell_label)?;
                Some(TableRow {
                    label,
                    cells: cells.to_vec(),
                })
            })
            .collect();

        Ok(Self {
            sheet: sheet.to_string(),
            header,
            rows,
        })
    }

    fn column(&self, name: &str) -> Result<usize, WorkbookError> {
        let wanted = Label::from(name);
        self.header
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, h)| h.as_ref() == Some(&wanted))
            .map(|(i, _)| i)
            .ok_or_else(|| WorkbookError::MissingColumn {
                sheet: self.sheet.clone(),
                column: name.to_string(),
            })
    }

    fn number(&self, row: &TableRow, col: usize) -> Result<f64, WorkbookError> {
        let cell = row.cells.get(col).unwrap_or(&Data::Empty);
        cell_number(cell).ok_or_else(|| WorkbookError::NotANumber {
            sheet: self.sheet.clone(),
            row: row.label.clone(),
            column: self.header_name(col),
            found: cell.to_string(),
        })
    }

    fn header_name(&self, col: usize) -> String {
        self.header
            .get(col)
            .and_then(|h| h.as_ref())
            .map(|h| h.to_string())
            .unwrap_or_else(|| format!("#{}", col))
    }

    /// Interpret every labelled column after the index as a matrix column.
    fn matrix(&self) -> Result<LabeledMatrix, WorkbookError> {
        let columns: Vec<(usize, Label)> = self
            .header
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, h)| h.clone().map(|h| (i, h)))
            .collect();

        let mut values = Vec::with_capacity(self.rows.len() * columns.len());
        for row in &self.rows {
            for &(col, _) in &columns {
                values.push(self.number(row, col)?);
            }
        }

        Ok(LabeledMatrix::new(
            self.rows.iter().map(|r| r.label.clone()).collect(),
            columns.into_iter().map(|(_, label)| label).collect(),
            values,
        ))
    }
}

fn cell_label(cell: &Data) -> Option<Label> {
    match cell {
        Data::Empty => None,
        Data::Int(i) => Some(Label::Int(*i)),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some(Label::Int(*f as i64)),
        Data::Float(f) => Some(Label::Text(f.to_string())),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(Label::Text(s.to_string()))
            }
        }
        other => Some(Label::Text(other.to_string())),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_network() -> Network {
        let fcs = vec![
            FulfillmentCenter { name: Label::Int(101), capacity: 500.0 },
            FulfillmentCenter { name: Label::from("FC-B"), capacity: 250.5 },
        ];
        let regions = vec![Region { id: Label::from("east") }, Region { id: Label::Int(7) }];
        let items = vec![Item {
            id: Label::from("widget"),
            shipping_weight: 1.5,
            storage_size: 0.25,
        }];
        let distances = LabeledMatrix::new(
            regions.iter().map(|r| r.id.clone()).collect(),
            fcs.iter().map(|f| f.name.clone()).collect(),
            vec![10.0, 20.0, 30.0, 40.0],
        );
        let demand = LabeledMatrix::new(
            items.iter().map(|i| i.id.clone()).collect(),
            regions.iter().map(|r| r.id.clone()).collect(),
            vec![5.0, 6.0],
        );
        Network { fcs, regions, items, distances, demand }
    }

    #[test]
    fn test_write_then_read_network() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.xlsx");
        let network = sample_network();

        write_network(&network, &path).unwrap();
        let read = read_network(&path).unwrap();

        assert_eq!(read.fcs, network.fcs);
        assert_eq!(read.regions, network.regions);
        assert_eq!(read.items, network.items);
        assert_eq!(read.distances.get(&Label::Int(7), &Label::Int(101)), Some(30.0));
        assert_eq!(read.distances.get(&Label::from("east"), &Label::from("FC-B")), Some(20.0));
        assert_eq!(read.demand.get(&Label::from("widget"), &Label::Int(7)), Some(6.0));
    }

    #[test]
    fn test_missing_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "FC_name").unwrap();
        sheet.write_string(0, 1, "capacity").unwrap();
        sheet.write_string(1, 0, "A").unwrap();
        sheet.write_number(1, 1, 10.0).unwrap();
        workbook.save(&path).unwrap();

        let err = read_network(&path).unwrap_err();
        assert!(matches!(err, WorkbookError::MissingSheet(ref s) if s == REGIONS_SHEET), "{err}");
    }

    #[test]
    fn test_missing_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nocap.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "FC_name").unwrap();
        sheet.write_string(0, 1, "size").unwrap();
        sheet.write_string(1, 0, "A").unwrap();
        sheet.write_number(1, 1, 10.0).unwrap();
        workbook.save(&path).unwrap();

        let err = read_network(&path).unwrap_err();
        assert!(
            matches!(err, WorkbookError::MissingColumn { ref column, .. } if column == CAPACITY_COLUMN),
            "{err}"
        );
    }

    #[test]
    fn test_non_numeric_capacity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("text.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "FC_name").unwrap();
        sheet.write_string(0, 1, "capacity").unwrap();
        sheet.write_string(1, 0, "A").unwrap();
        sheet.write_string(1, 1, "lots").unwrap();
        workbook.save(&path).unwrap();

        let err = read_network(&path).unwrap_err();
        match err {
            WorkbookError::NotANumber { row, column, found, .. } => {
                assert_eq!(row, Label::from("A"));
                assert_eq!(column, "capacity");
                assert_eq!(found, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cell_label_normalizes_integers() {
        assert_eq!(cell_label(&Data::Float(3.0)), Some(Label::Int(3)));
        assert_eq!(cell_label(&Data::Float(2.5)), Some(Label::from("2.5")));
        assert_eq!(cell_label(&Data::String("  ".to_string())), None);
        assert_eq!(cell_label(&Data::Empty), None);
    }
}
