//! Output filenames.
//!
//! - `portrait.jpg` → `portrait_nobg.png`
//! - `photos/cat.PNG` → `cat_nobg.png`
//! - `archive.tar.jpg` → `archive.tar_nobg.png`
//! - `.jpg` → `image_nobg.png`
//!
//! Names that repeat within one batch get a numeric suffix:
//! `cat_nobg.png`, `cat_nobg_1.png`, `cat_nobg_2.png`.

use std::collections::HashSet;

/// Suffix appended to every output stem.
pub const OUTPUT_SUFFIX: &str = "_nobg";

/// Stem used when a filename has none.
const FALLBACK_STEM: &str = "image";

/// Final path component with its last extension removed.
fn stem(original: &str) -> &str {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    match base.rfind('.') {
        // `.jpg` has no stem
        Some(0) => "",
        Some(dot) => &base[..dot],
        None => base,
    }
}

/// Derive `<stem>_nobg.<ext>` from an uploaded filename.
pub fn output_filename(original: &str, ext: &str) -> String {
    let stem = stem(original).trim();
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext)
}

/// Hands out filenames that are unique within one batch.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name`, or `<stem>_<n>.<ext>` for the smallest free `n`.
    pub fn claim(&mut self, name: &str) -> String {
        if self.taken.insert(name.to_string()) {
            return name.to_string();
        }

        let (base, ext) = match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
            _ => (name, ""),
        };

        let mut n = 1;
        loop {
            let candidate = format!("{}_{}{}", base, n, ext);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
