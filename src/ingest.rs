use std::fs;
use std::path::Path;

use tracing::debug;

use crate::data::Record;
use crate::errors::PipelineError;
use crate::format::RecordFormat;

/// Load one raw input file into ordered records labeled with `source`.
///
/// Ids are assigned as `<source>_<i>` for `i` in file order, starting at
/// zero. Pure with respect to file content and source label; the only side
/// effect is reading the file.
pub fn ingest(path: impl AsRef<Path>, source: &str) -> Result<Vec<Record>, PipelineError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            kind: "input file",
            path: path.to_path_buf(),
        });
    }
    let format = RecordFormat::for_path(path)?;
    let bytes = fs::read(path)?;
    let pairs = format.read(&bytes)?;
    debug!(path = %path.display(), count = pairs.len(), "decoded raw pairs");
    Ok(pairs
        .into_iter()
        .enumerate()
        .map(|(ordinal, (input, output))| Record::new(source, ordinal, input, output))
        .collect())
}
