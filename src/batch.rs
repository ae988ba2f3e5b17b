//! Runs reconciliation over several input files.
//!
//! Each file is its own batch with its own engine. A file that fails to load
//! or write is reported and skipped; the others are unaffected.

use crate::config::Config;
use crate::engine::ReconcileEngine;
use crate::error::Result;
use crate::output::OutputFormat;
use crate::reconciler::MatchPolicy;
use log::{error, info, warn};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Suffix replacing `.csv` on output file names.
pub const OUTPUT_SUFFIX: &str = ".reconciled.csv";

/// Outcome of a multi-file run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Output files written, in input order.
    pub written: Vec<PathBuf>,

    /// Inputs that produced no output, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Returns where the output for `input` goes inside `output_dir`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    output_dir.join(format!("{}{}", stem, OUTPUT_SUFFIX))
}

/// Reconciles one file and writes its output, returning the output path.
pub fn reconcile_file(
    input: &Path,
    output_dir: &Path,
    format: OutputFormat,
    policy: MatchPolicy,
) -> Result<PathBuf> {
    let reader = BufReader::new(File::open(input)?);

    let mut engine = ReconcileEngine::with_policy(policy);
    engine.load_csv(reader)?;
    let records = engine.reconcile()?;
    let leftovers = records.iter().filter(|r| r.is_leftover()).count();
    info!(
        "{}: {} settlements, {} leftovers",
        input.display(),
        records.len() - leftovers,
        leftovers
    );

    fs::create_dir_all(output_dir)?;
    let path = output_path(input, output_dir);
    write_atomically(output_dir, &path, |writer| engine.write_output(writer, format))?;

    Ok(path)
}

/// Writes `path` through a temporary file in `dir`, renamed into place only
/// once `write` succeeds. On failure `path` is left untouched.
pub fn write_atomically<F>(dir: &Path, path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Reconciles every input named in `config`.
pub fn run(config: &Config) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let mut outputs = HashSet::new();

    for input in &config.inputs {
        match reconcile_file(input, &config.output_dir, config.format, config.policy) {
            Ok(path) => {
                info!("{}: wrote {}", input.display(), path.display());
                if !outputs.insert(path.clone()) {
                    warn!(
                        "{}: overwrote {} written for an earlier input with the same name",
                        input.display(),
                        path.display()
                    );
                }
                summary.written.push(path);
            }
            Err(e) => {
                error!("Unable to process file {}: {}", input.display(), e);
                summary.failed.push((input.clone(), e.to_string()));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("data/jan.csv"), Path::new("out")),
            PathBuf::from("out/jan.reconciled.csv")
        );
        assert_eq!(
            output_path(Path::new("feb"), Path::new("out")),
            PathBuf::from("out/feb.reconciled.csv")
        );
    }

    #[test]
    fn test_interrupted_write_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jan.reconciled.csv");

        let result = write_atomically(dir.path(), &path, |writer| {
            writer.write_all(b"id, name, parent, amount\n")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_interrupted_write_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jan.reconciled.csv");
        fs::write(&path, "previous").unwrap();

        let result = write_atomically(dir.path(), &path, |writer| {
            writer.write_all(b"partial")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_same_stem_inputs_share_output() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "id,name,amount,date,is_cash,is_atm\n1,W,10,2020-01-01,false,true\n";
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("jan.csv"), csv).unwrap();
        }

        let out = dir.path().join("out");
        let config = Config {
            inputs: vec![dir.path().join("a/jan.csv"), dir.path().join("b/jan.csv")],
            output_dir: out.clone(),
            format: OutputFormat::Legacy,
            policy: MatchPolicy::default(),
        };

        let summary = run(&config);

        assert!(summary.all_succeeded());
        assert_eq!(summary.written.len(), 2);
        assert_eq!(summary.written[0], summary.written[1]);
    }

    #[test]
    fn test_failed_file_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        fs::write(
            &good,
            "id,name,amount,date,is_cash,is_atm\n1,W,10,2020-01-01,false,true\n2,C,4,2020-01-02,true,false\n",
        )
        .unwrap();
        let bad = dir.path().join("bad.csv");
        fs::write(&bad, "id,name,amount,date,is_cash,is_atm\n1,W,10\n").unwrap();
        let missing = dir.path().join("missing.csv");

        let out = dir.path().join("out");
        let config = Config {
            inputs: vec![bad.clone(), missing.clone(), good],
            output_dir: out.clone(),
            format: OutputFormat::Legacy,
            policy: MatchPolicy::default(),
        };

        let summary = run(&config);

        assert!(!summary.all_succeeded());
        assert_eq!(summary.written, vec![out.join("good.reconciled.csv")]);
        let failed: Vec<&PathBuf> = summary.failed.iter().map(|(p, _)| p).collect();
        assert_eq!(failed, vec![&bad, &missing]);
        assert!(!out.join("bad.reconciled.csv").exists());
        assert_eq!(
            fs::read_to_string(out.join("good.reconciled.csv")).unwrap(),
            "id, name, parent, amount\n2, C, 1, 4\n"
        );
    }
}
