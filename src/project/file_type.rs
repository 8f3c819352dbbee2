//! File classification for project entries.
//!
//! µVision tags every file entry with a numeric `FileType` code that tells the
//! IDE whether to compile, assemble or link it. The code is derived from the
//! file extension.

use std::{
    fmt::{Display, Formatter, Result},
    path::Path,
};

/// Extensions picked up when scanning a folder for sources and headers.
pub const SCANNED_EXTENSIONS: [&str; 6] = ["c", "cpp", "h", "hpp", "s", "asm"];

/// The kind of a file entry, as stored in the `FileType` element.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FileType {
    /// C source (`.c`), also the fallback for unknown extensions
    CSource,

    /// Assembly source (`.s`, `.asm`)
    Assembly,

    /// Library archive (`.lib`, `.a`)
    Library,

    /// Header (`.h`, `.hpp`)
    Header,

    /// C++ source (`.cpp`)
    CppSource,
}

impl FileType {
    /// Classify a path by its extension (case-insensitive).
    ///
    /// Unknown or missing extensions are treated as C sources.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("cpp") => Self::CppSource,
            Some("h" | "hpp") => Self::Header,
            Some("s" | "asm") => Self::Assembly,
            Some("lib" | "a") => Self::Library,
            _ => Self::CSource,
        }
    }

    /// Map a stored code back to a type, if it is one this tool writes.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::CSource),
            2 => Some(Self::Assembly),
            4 => Some(Self::Library),
            5 => Some(Self::Header),
            8 => Some(Self::CppSource),
            _ => None,
        }
    }

    /// The numeric code written to the project file.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::CSource => 1,
            Self::Assembly => 2,
            Self::Library => 4,
            Self::Header => 5,
            Self::CppSource => 8,
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let label = match self {
            Self::CSource => "C source",
            Self::Assembly => "assembly",
            Self::Library => "library",
            Self::Header => "header",
            Self::CppSource => "C++ source",
        };
        write!(f, "{label}")
    }
}

/// Whether a folder scan should pick up this file.
#[must_use]
pub fn is_scanned(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SCANNED_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether this file is a header, which makes its directory an include path.
#[must_use]
pub fn is_header(path: &Path) -> bool {
    FileType::from_path(path) == FileType::Header
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        let cases = [
            ("main.c", FileType::CSource, 1),
            ("app.cpp", FileType::CppSource, 8),
            ("board.h", FileType::Header, 5),
            ("board.hpp", FileType::Header, 5),
            ("startup.s", FileType::Assembly, 2),
            ("startup.asm", FileType::Assembly, 2),
            ("cmsis.lib", FileType::Library, 4),
            ("libm.a", FileType::Library, 4),
            ("notes.txt", FileType::CSource, 1),
            ("Makefile", FileType::CSource, 1),
        ];

        for (name, expected, code) in cases {
            let file_type = FileType::from_path(Path::new(name));
            assert_eq!(file_type, expected, "{name}");
            assert_eq!(file_type.code(), code, "{name}");
        }
    }

    #[test]
    fn test_classification_ignores_case() {
        assert_eq!(FileType::from_path(Path::new("STARTUP.S")), FileType::Assembly);
        assert_eq!(FileType::from_path(Path::new("Board.H")), FileType::Header);
        assert_eq!(FileType::from_path(Path::new("App.CPP")), FileType::CppSource);
    }

    #[test]
    fn test_from_code_round_trips_known_codes() {
        for code in [1, 2, 4, 5, 8] {
            assert_eq!(FileType::from_code(code).map(FileType::code), Some(code));
        }
        assert_eq!(FileType::from_code(3), None);
    }

    #[test]
    fn test_is_scanned() {
        assert!(is_scanned(Path::new("src/main.c")));
        assert!(is_scanned(Path::new("src/startup.ASM")));
        assert!(!is_scanned(Path::new("lib/cmsis.lib")));
        assert!(!is_scanned(Path::new("README.md")));
        assert!(!is_scanned(Path::new("Makefile")));
    }

    #[test]
    fn test_is_header() {
        assert!(is_header(Path::new("inc/board.h")));
        assert!(is_header(Path::new("inc/board.HPP")));
        assert!(!is_header(Path::new("src/main.c")));
    }
}
