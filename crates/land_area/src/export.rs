use std::{
    error,
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter},
    path::Path as FsPath,
    result,
};

use model::{GeoPoint, InvalidCoordinate, Path};
use serde::{Deserialize, Serialize};

pub const CSV_HEADER: [&str; 2] = ["Latitude", "Longitude"];
pub const DEFAULT_FILE_NAME: &str = "walk_path.csv";

/// One line of the interchange file.
///
/// Coordinates are written with at least six decimals and never rounded, so
/// point order and precision survive an export/import cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PathRow {
    #[serde(rename = "Latitude", with = "utility::serde::coordinate")]
    latitude: f64,
    #[serde(rename = "Longitude", with = "utility::serde::coordinate")]
    longitude: f64,
}

impl From<&GeoPoint> for PathRow {
    fn from(point: &GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Csv(csv::Error),
    UnexpectedHeader(Vec<String>),
    InvalidCoordinate {
        row: usize,
        coordinate: InvalidCoordinate,
    },
}

impl error::Error for ExportError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ExportError::Io(why) => Some(why),
            ExportError::Csv(why) => Some(why),
            ExportError::InvalidCoordinate { coordinate, .. } => Some(coordinate),
            ExportError::UnexpectedHeader(_) => None,
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportError::Io(why) => write!(f, "I/O error: {}", why),
            ExportError::Csv(why) => write!(f, "CSV error: {}", why),
            ExportError::UnexpectedHeader(header) => write!(
                f,
                "unexpected header '{}', expected '{}'",
                header.join(","),
                CSV_HEADER.join(",")
            ),
            ExportError::InvalidCoordinate { row, coordinate } => {
                write!(f, "row {}: {}", row, coordinate)
            }
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(why: io::Error) -> Self {
        ExportError::Io(why)
    }
}

impl From<csv::Error> for ExportError {
    fn from(why: csv::Error) -> Self {
        ExportError::Csv(why)
    }
}

pub type Result<T> = result::Result<T, ExportError>;

/// Writes the header and one row per point, in path order. An empty path
/// still gets its header.
pub fn write_csv<W: io::Write>(path: &Path, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for point in path {
        writer.serialize(PathRow::from(point))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(path: &Path) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(path, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|why| ExportError::Io(io::Error::new(io::ErrorKind::InvalidData, why)))
}

/// Reads a path back in file order. Rows are numbered from 1, not counting
/// the header.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Path> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = reader.headers()?;
    if header.len() != CSV_HEADER.len()
        || header
            .iter()
            .zip(CSV_HEADER)
            .any(|(found, expected)| !found.eq_ignore_ascii_case(expected))
    {
        return Err(ExportError::UnexpectedHeader(
            header.iter().map(str::to_owned).collect(),
        ));
    }

    let mut path = Path::new();
    for (index, row) in reader.deserialize::<PathRow>().enumerate() {
        let row = row?;
        let point = GeoPoint::try_from((row.latitude, row.longitude)).map_err(
            |coordinate| ExportError::InvalidCoordinate {
                row: index + 1,
                coordinate,
            },
        )?;
        path.push(point);
    }
    Ok(path)
}

pub fn export_to_file(path: &Path, file: impl AsRef<FsPath>) -> Result<()> {
    let file = file.as_ref();
    log::info!("exporting {} points to {}", path.len(), file.display());
    write_csv(path, BufWriter::new(File::create(file)?))
}

pub fn import_from_file(file: impl AsRef<FsPath>) -> Result<Path> {
    let file = file.as_ref();
    let path = read_csv(BufReader::new(File::open(file)?))?;
    log::info!("imported {} points from {}", path.len(), file.display());
    Ok(path)
}
