pub mod csv_sink;
#[cfg(feature = "dataframe")]
pub mod dataframe;
pub mod sink;
