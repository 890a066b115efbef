use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a text file as raw 8-bit characters.
///
/// No decoding is performed: every byte is one character code.
pub fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<Vec<u8>> {
	fs::read(filename)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/corpus.txt"` → `"corpus"`
/// - `"corpus.txt"` → `"corpus"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted by name.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Decodes 8-bit characters, each byte becoming the char of the same code point.
pub fn latin1_to_string(bytes: &[u8]) -> String {
	bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encodes a string as 8-bit characters.
///
/// Returns `None` if a char lies above U+00FF.
pub fn string_to_latin1(s: &str) -> Option<Vec<u8>> {
	s.chars().map(|c| u8::try_from(c).ok()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filename_without_extension() {
		assert_eq!(get_filename("./data/corpus.txt").unwrap(), "corpus");
		assert_eq!(get_filename("corpus").unwrap(), "corpus");
		assert!(get_filename("/").is_err());
	}

	#[test]
	fn lists_matching_files_sorted() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), b"b").unwrap();
		fs::write(dir.path().join("a.txt"), b"a").unwrap();
		fs::write(dir.path().join("c.dat"), b"c").unwrap();
		fs::create_dir(dir.path().join("d.txt")).unwrap();

		assert_eq!(list_files(dir.path(), "txt").unwrap(), vec!["a.txt", "b.txt"]);
	}

	#[test]
	fn reads_raw_bytes() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("raw.txt");
		fs::write(&path, [b'a', 0xe9, b'\n']).unwrap();
		assert_eq!(read_text(&path).unwrap(), vec![b'a', 0xe9, b'\n']);
	}

	#[test]
	fn latin1_conversions() {
		assert_eq!(latin1_to_string(&[b'c', b'a', b'f', 0xe9]), "café");
		assert_eq!(string_to_latin1("café"), Some(vec![b'c', b'a', b'f', 0xe9]));
		assert_eq!(string_to_latin1("→"), None);
	}
}
