/// Data layer: the loaded table and the CSV loader.
///
/// Architecture:
/// ```text
///   instrument .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  skip `#` / blank preamble, parse header + numeric rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  Vec<Column>, skip_rows
///   └──────────┘
/// ```

pub mod loader;
pub mod model;

pub use loader::load_table;
pub use model::{Column, Table};
