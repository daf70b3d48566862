use std::path::PathBuf;

/// A Latin-capable font file installed on this machine, if any.
pub fn system_font_path() -> Option<PathBuf> {
	const PREFERRED: [&str; 5] = ["DejaVu Sans", "Liberation Sans", "Noto Sans", "FreeSans", "Arial"];

	let mut db = fontdb::Database::new();
	db.load_system_fonts();
	let file_of = |face: &fontdb::FaceInfo| match &face.source {
		fontdb::Source::File(path) => Some(path.clone()),
		_ => None,
	};
	PREFERRED
		.iter()
		.find_map(|want| db.faces().filter(|face| face.families.iter().any(|(name, _)| name == want)).find_map(file_of))
		.or_else(|| db.faces().filter(|face| !face.families.is_empty()).find_map(file_of))
}
