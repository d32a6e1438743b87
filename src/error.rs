use std::{error, fmt};

use crate::sequence::ReadId;

pub type ContigResult<T> = Result<T, ContigError>;

/// Type encapsulating the ways stitching a single read path, or
/// writing the resulting contigs, can fail. Every variant that
/// concerns a path carries the index of that path in the path source,
/// so a multi-path driver can report it and keep going.
#[derive(Debug)]
pub enum ContigError {
    /// The forced closing window of a circular path was empty or
    /// negative, i.e. the walk did not progress all the way around.
    UnclosedCircle {
        path_index: usize,
        read_id: ReadId,
        left_cut: usize,
        right_cut: usize,
    },
    /// A read in the path has no record in the sequence store.
    MissingRead { path_index: usize, read_id: ReadId },
    /// A computed window does not fit inside the read's sequence.
    WindowOutOfBounds {
        path_index: usize,
        read_id: ReadId,
        left_cut: usize,
        right_cut: usize,
        read_len: usize,
    },
    /// Wrapper for an IO error.
    IOError(std::io::Error),
}

impl fmt::Display for ContigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ContigError as CE;
        match self {
            CE::UnclosedCircle {
                path_index,
                read_id,
                left_cut,
                right_cut,
            } => write!(
                f,
                "Error finishing circle for path {}: closing window [{}:{}) on read {} is not positive",
                path_index, left_cut, right_cut, read_id
            ),
            CE::MissingRead {
                path_index,
                read_id,
            } => write!(
                f,
                "Read {} in path {} has no sequence record",
                read_id, path_index
            ),
            CE::WindowOutOfBounds {
                path_index,
                read_id,
                left_cut,
                right_cut,
                read_len,
            } => write!(
                f,
                "Window [{}:{}) in path {} exceeds read {} of length {}",
                left_cut, right_cut, path_index, read_id, read_len
            ),
            CE::IOError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl From<std::io::Error> for ContigError {
    #[inline]
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err)
    }
}

impl error::Error for ContigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ContigError::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl ContigError {
    /// The index of the path this error belongs to, if it is
    /// path-scoped at all.
    #[inline]
    pub fn path_index(&self) -> Option<usize> {
        use ContigError as CE;
        match self {
            CE::UnclosedCircle { path_index, .. }
            | CE::MissingRead { path_index, .. }
            | CE::WindowOutOfBounds { path_index, .. } => Some(*path_index),
            CE::IOError(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclosed_circle_message() {
        let err = ContigError::UnclosedCircle {
            path_index: 2,
            read_id: 7,
            left_cut: 850,
            right_cut: 800,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Error finishing circle"));
        assert!(msg.contains("[850:800)"));
        assert!(msg.contains("read 7"));
        assert_eq!(err.path_index(), Some(2));
    }

    #[test]
    fn io_errors_are_not_path_scoped() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: ContigError = io.into();
        assert_eq!(err.path_index(), None);
        assert!(error::Error::source(&err).is_some());
    }
}
