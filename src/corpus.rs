//! Synthetic corpus generation
//!
//! Writes a directory of numbered HTML pages whose hyperlinks form a
//! random graph, for upload to a bucket and benchmarking against. Every
//! page gets at least one outgoing link, so a freshly generated corpus has
//! no dangling pages.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Corpus generation settings.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Number of pages to write, identified `0..pages`.
    pub pages: u32,
    /// Exclusive upper bound on links per page. Bounds below 2 are
    /// treated as 2, which pins every page to a single link.
    pub max_refs: u32,
    /// RNG seed. Equal seeds produce byte-identical corpora.
    pub seed: u64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            pages: 10_000,
            max_refs: 250,
            seed: 0,
        }
    }
}

const HEADER: &str = "<!DOCTYPE html>\n<html>\n<body>\n";
const FOOTER: &str = "</body>\n</html>\n";
const FILLER: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
    sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad\n\
    minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea \
    commodo consequat. Duis aute irure dolor in reprehenderit in voluptate velit esse\n\
    cillum dolore eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non \
    proident, sunt in culpa qui officia deserunt mollit anim id est laborum.\n<p>\n";

/// Write the corpus into `dir`, one `<id>.html` file per page.
///
/// The directory is created if missing. Existing files with colliding
/// names are overwritten.
pub fn generate(dir: &Path, config: &CorpusConfig) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    for page in 0..config.pages {
        let path = dir.join(format!("{page}.html"));
        let mut out = BufWriter::new(File::create(path)?);
        write_page(&mut out, &mut rng, config)?;
        out.flush()?;
    }
    Ok(())
}

fn write_page(out: &mut impl Write, rng: &mut StdRng, config: &CorpusConfig) -> io::Result<()> {
    out.write_all(HEADER.as_bytes())?;

    let refs = rng.gen_range(1..config.max_refs.max(2));
    for _ in 0..refs {
        out.write_all(FILLER.as_bytes())?;
        let target = rng.gen_range(0..config.pages);
        writeln!(out, "<a HREF=\"{target}.html\"> This is a link </a>\n<p>")?;
    }

    out.write_all(FOOTER.as_bytes())
}
