//! Labelling of the PASYDA victim tables.
//!
//! - `pairing`   : find `perp_<X>_vic_data.csv` / `perp_<X>_solutions.csv` pairs
//! - `labeler`   : append the `grooming_label` column to one victim table
//! - `aggregate` : concatenate all labelled tables into one file
//! - `pipeline`  : the whole run, in the order the binary executes it

pub mod aggregate;
pub mod ids;
pub mod labeler;
pub mod pairing;
pub mod pipeline;
pub mod table;

pub use aggregate::{combine_labelled, CombinedFile, COMBINED_FILE_NAME};
pub use ids::{normalize_id, GroomingLabel, SolutionIds, ID_COLUMN, LABEL_COLUMN};
pub use labeler::{label_victim_file, LabelledFile};
pub use pairing::{find_pairs, scan_dataset, DatasetScan, Pair};
pub use pipeline::{run, Config, RunReport};
pub use table::Table;
