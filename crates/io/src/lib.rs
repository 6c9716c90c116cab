// File I/O for reconciliation input and annotated output

pub mod annotate;
pub mod csv;
pub mod xlsx;
