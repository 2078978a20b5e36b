use std::collections::HashMap;
use std::fmt;

/// Identifier read from a spreadsheet cell.
///
/// Integer-valued cells stay integers so that FC `7` in one sheet matches the
/// column header `7` in another.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Int(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(i) => write!(f, "{}", i),
            Label::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentCenter {
    pub name: Label,
    /// Storage units available
    pub capacity: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: Label,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: Label,
    pub shipping_weight: f64,
    pub storage_size: f64,
}

/// Dense matrix addressed by row and column labels
#[derive(Debug, Clone, Default)]
pub struct LabeledMatrix {
    rows: Vec<Label>,
    columns: Vec<Label>,
    row_index: HashMap<Label, usize>,
    column_index: HashMap<Label, usize>,
    /// Row-major
    values: Vec<f64>,
}

/// Distance per (region, FC); rows are regions, columns FCs.
pub type DistanceMatrix = LabeledMatrix;

/// Required quantity per (item, region); rows are items, columns regions.
pub type DemandMatrix = LabeledMatrix;

impl LabeledMatrix {
    /// Build a matrix from row-major values.
    ///
    /// Panics if `values.len() != rows.len() * columns.len()`.
    pub fn new(rows: Vec<Label>, columns: Vec<Label>, values: Vec<f64>) -> Self {
        assert_eq!(
            values.len(),
            rows.len() * columns.len(),
            "matrix values do not match its shape"
        );
        let row_index = index_of(&rows);
        let column_index = index_of(&columns);
        Self {
            rows,
            columns,
            row_index,
            column_index,
            values,
        }
    }

    pub fn from_fn(rows: Vec<Label>, columns: Vec<Label>, mut f: impl FnMut(&Label, &Label) -> f64) -> Self {
        let values = rows
            .iter()
            .flat_map(|r| columns.iter().map(move |c| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        Self::new(rows, columns, values)
    }

    pub fn get(&self, row: &Label, column: &Label) -> Option<f64> {
        let r = *self.row_index.get(row)?;
        let c = *self.column_index.get(column)?;
        Some(self.values[r * self.columns.len() + c])
    }

    pub fn rows(&self) -> &[Label] {
        &self.rows
    }

    pub fn columns(&self) -> &[Label] {
        &self.columns
    }
}

/// Duplicate labels resolve to their first occurrence.
fn index_of(labels: &[Label]) -> HashMap<Label, usize> {
    let mut index = HashMap::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        index.entry(label.clone()).or_insert(i);
    }
    index
}

/// All input tables of one planning run
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub fcs: Vec<FulfillmentCenter>,
    pub regions: Vec<Region>,
    pub items: Vec<Item>,
    pub distances: DistanceMatrix,
    pub demand: DemandMatrix,
}

impl Network {
    pub fn num_shipment_variables(&self) -> usize {
        self.fcs.len() * self.regions.len() * self.items.len()
    }
}
