use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::ColumnCatalog;
use crate::cell::{Cell, Column as TableColumn, Row};
use crate::domain::TVError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub file_type: FileType,
}

impl FileInfo {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string()
    }
}

/// Reads a data file into a catalog. Nulls in the file become [`Cell::Null`].
pub fn load_data_file(path: PathBuf) -> Result<(FileInfo, ColumnCatalog), TVError> {
    let file_info = get_file_info(path)?;
    let frame = match file_info.file_type {
        FileType::CSV => load_csv(&file_info.path)?,
        FileType::PARQUET => load_parquet(&file_info.path)?,
        FileType::ARROW => load_arrow(&file_info.path)?,
    };

    let start_time = Instant::now();
    let catalog = catalog_from_frame(&frame.collect()?)?;
    info!(
        "Loading {} ({} bytes) took {}ms ...",
        file_info.path.display(),
        file_info.file_size,
        start_time.elapsed().as_millis()
    );
    Ok((file_info, catalog))
}

/// Converts a collected frame, one column per rayon task.
pub fn catalog_from_frame(df: &DataFrame) -> Result<ColumnCatalog, TVError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let cells: Result<Vec<Vec<Cell>>, PolarsError> = names
        .par_iter()
        .map(|name| load_column(df, name))
        .collect();
    let cells = cells?;

    for (name, column) in names.iter().zip(cells.iter()) {
        debug!("Column: \"{}\", # rows {}", name, column.len());
    }

    let nrows = df.height();
    let mut columns_iter: Vec<_> = cells.into_iter().map(Vec::into_iter).collect();
    let rows: Vec<Row> = (0..nrows)
        .map(|_| {
            columns_iter
                .iter_mut()
                .map(|column| column.next().unwrap_or(Cell::Null))
                .collect()
        })
        .collect();

    let columns = names.into_iter().map(TableColumn::new).collect();
    Ok(ColumnCatalog::new(columns, rows))
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<Vec<Cell>, PolarsError> {
    let column = df.column(col_name)?;
    let dtype = column.dtype().clone();

    let cells: Vec<Cell> = match dtype {
        DataType::Boolean => column.bool()?.into_iter().map(Cell::from).collect(),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let casted = column.cast(&DataType::Int64)?;
            casted.i64()?.into_iter().map(Cell::from).collect()
        }
        DataType::Float64 => column.f64()?.into_iter().map(Cell::from).collect(),
        // Widening to f64 would add digits the file never had.
        DataType::Float32 => {
            let casted = column.cast(&DataType::String)?;
            casted.str()?.into_iter().map(parse_cell::<f64>).collect()
        }
        // Values above i64::MAX stay text.
        DataType::UInt64 => {
            let casted = column.cast(&DataType::String)?;
            casted.str()?.into_iter().map(parse_cell::<i64>).collect()
        }
        _ => {
            let casted = column.cast(&DataType::String)?;
            casted.str()?.into_iter().map(Cell::from).collect()
        }
    };
    Ok(cells)
}

fn parse_cell<T: FromStr + Into<Cell>>(text: Option<&str>) -> Cell {
    match text {
        Some(text) => text.parse::<T>().map_or_else(|_| Cell::from(text), Into::into),
        None => Cell::Null,
    }
}

fn detect_file_type(path: &Path) -> Result<FileType, TVError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .unwrap_or_default();
    match extension.as_str() {
        "CSV" => Ok(FileType::CSV),
        "PARQUET" | "PQ" => Ok(FileType::PARQUET),
        "ARROW" | "IPC" | "FEATHER" => Ok(FileType::ARROW),
        _ => Err(TVError::UnknownFileType(extension)),
    }
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, TVError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TVError::FileNotFound,
        ErrorKind::PermissionDenied => TVError::PermissionDenied,
        _ => TVError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(TVError::LoadingFailed("Not a file!".into()));
    }

    let file_type = detect_file_type(&path)?;
    Ok(FileInfo {
        path,
        file_size: metadata.len(),
        file_type,
    })
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}
