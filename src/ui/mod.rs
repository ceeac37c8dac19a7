pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    banner, closing, dim, human_kb, item_line, none_line, section, status, success, summary_row, warn,
};
pub use table::{BackupRow, TableBuilder, backup_table, status_table};
pub use theme::{init_theme, theme, Theme};
