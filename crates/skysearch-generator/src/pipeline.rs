use std::{
    env,
    fs::{self, File},
    io::{self, BufRead as _, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    process,
    sync::atomic::{AtomicU64, Ordering},
};

use log::info;
use skysearch_core::{Board, ObjectCounts, ParseBoardError};
use skysearch_rules::{FillError, Rule, combin::PermutationCache};

use crate::BoardType;

/// Streaming options for [`BoardType::generate_to_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateConfig {
    /// Maximum number of boards read into memory at once.
    ///
    /// `None` reads each stage file in a single chunk.
    pub chunk_size: Option<usize>,
    /// Restrict the run to one shard of the search space.
    pub shard: Option<Shard>,
}

/// One slice of a generation run split across `count` workers.
///
/// Sharding keeps every board whose position in the first stage's output
/// is congruent to `index` modulo `count`. The outputs of all `count`
/// shards partition the full board set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shard {
    index: usize,
    count: usize,
}

impl Shard {
    /// Creates shard `index` of a `count`-way split.
    ///
    /// Returns `None` unless `index < count`.
    #[must_use]
    pub fn new(index: usize, count: usize) -> Option<Self> {
        (index < count).then_some(Self { index, count })
    }

    /// This worker's slice, in `0..count()`.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    /// Total number of slices.
    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }
}

/// Error produced by a generation run.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GenerateError {
    /// A stage or output file could not be read or written.
    #[display("board file I/O failed: {_0}")]
    Io(io::Error),
    /// A stage file held a malformed board line.
    #[display("malformed stage file: {_0}")]
    Parse(ParseBoardError),
    /// A rule in the set cannot drive a fill.
    #[display("rule cannot fill boards: {_0}")]
    Fill(FillError),
}

/// Summary of a finished generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Partial boards surviving each rule stage, in stage order.
    pub stage_counts: Vec<u64>,
    /// Finished boards written to the output file.
    pub num_boards: u64,
}

impl BoardType {
    /// Generates every valid board of this type, one per output line.
    ///
    /// Each rule runs as one stage over a temporary file of partial
    /// boards, and the final stage completes the survivors with the
    /// leftover objects. The output appears atomically: boards are
    /// written to a `.partial` sibling which is renamed into place once
    /// the run finishes.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, on malformed stage files, and when a rule
    /// cannot drive a fill.
    pub fn generate_to_file(
        &self,
        output: &Path,
        config: &GenerateConfig,
    ) -> Result<GenerateReport, GenerateError> {
        let rules = self.ordered_rules();
        info!("generating {}-sector boards in {} stages", self.num_sectors(), rules.len() + 1);

        let mut report = GenerateReport::default();
        let mut previous: Option<StageFile> = None;
        let mut last_count = 1;

        for (stage, rule) in rules.iter().enumerate() {
            info!("stage {}/{}: {rule}", stage + 1, rules.len() + 1);
            let current = StageFile::new(stage);
            let mut writer = StageWriter::create(&current.path)?;
            let mut count = 0;

            match &previous {
                None => {
                    let empty = Board::new(self.num_sectors());
                    count += write_fills(rule, &empty, self.counts(), &mut writer)?;
                }
                Some(stage_file) => {
                    let mut progress = Progress::new(last_count);
                    let mut chunks = ChunkedBoards::open(&stage_file.path, config.chunk_size)?;
                    while let Some(boards) = chunks.next_chunk()? {
                        for board in &boards {
                            count += write_fills(rule, board, self.counts(), &mut writer)?;
                            progress.step();
                        }
                    }
                }
            }
            writer.commit()?;

            if stage == 0
                && let Some(shard) = config.shard
                && shard.count > 1
            {
                count = filter_shard(&current.path, shard)?;
                info!("shard {}/{} keeps {count} boards", shard.index, shard.count);
            }
            info!("{count} partial boards after stage {}", stage + 1);
            report.stage_counts.push(count);
            last_count = count;
            previous = Some(current);
        }

        info!("stage {0}/{0}: completing boards with the remaining objects", rules.len() + 1);
        let mut writer = StageWriter::create(output)?;
        let mut cache = PermutationCache::new();
        match &previous {
            None => {
                let empty = Board::new(self.num_sectors());
                report.num_boards += self.write_completions(&empty, &mut cache, &mut writer)?;
            }
            Some(stage_file) => {
                let mut progress = Progress::new(last_count);
                let mut chunks = ChunkedBoards::open(&stage_file.path, config.chunk_size)?;
                while let Some(boards) = chunks.next_chunk()? {
                    for board in &boards {
                        report.num_boards += self.write_completions(board, &mut cache, &mut writer)?;
                        progress.step();
                    }
                }
            }
        }
        writer.commit()?;

        info!("{} boards written to {}", report.num_boards, output.display());
        Ok(report)
    }

    /// Generates every valid board of this type in memory.
    ///
    /// Suits small board types; large ones should stream through
    /// [`generate_to_file`](Self::generate_to_file) instead.
    ///
    /// # Errors
    ///
    /// Fails when a rule cannot drive a fill.
    pub fn generate_all(&self) -> Result<Vec<Board>, FillError> {
        let mut boards = vec![Board::new(self.num_sectors())];
        for rule in self.ordered_rules() {
            let mut survivors = Vec::new();
            for board in &boards {
                survivors.extend(rule.fill_board(board, self.counts())?);
            }
            boards = survivors;
        }
        let mut cache = PermutationCache::new();
        let mut finished = Vec::new();
        for board in &boards {
            finished.extend(self.completions(board, &mut cache));
        }
        Ok(finished)
    }

    /// Fills the board's open sectors with every arrangement of the
    /// objects not yet placed, keeping arrangements that satisfy the
    /// rules still touched by those objects.
    fn completions(&self, board: &Board, cache: &mut PermutationCache) -> Vec<Board> {
        let remaining = self.remaining_counts(board);
        let relevant = self.relevant_rules(&remaining);
        let counts = remaining
            .iter()
            .map(|(object, count)| (Some(object), count))
            .collect::<Vec<_>>();
        let mut finished = Vec::new();
        for permutation in cache.permutations(&counts) {
            let mut candidate = board.clone();
            let mut objects = permutation.iter();
            for i in 0..candidate.len() as isize {
                if candidate.at(i).is_none()
                    && let Some(&object) = objects.next()
                {
                    candidate.set(i, object);
                }
            }
            if relevant.iter().all(|rule| rule.is_satisfied(&candidate)) {
                finished.push(candidate);
            }
        }
        finished
    }

    fn write_completions(
        &self,
        board: &Board,
        cache: &mut PermutationCache,
        writer: &mut StageWriter,
    ) -> Result<u64, GenerateError> {
        let mut written = 0;
        for finished in self.completions(board, cache) {
            writeln!(writer.inner, "{finished}")?;
            written += 1;
        }
        Ok(written)
    }
}

fn write_fills(
    rule: &Rule,
    board: &Board,
    counts: &ObjectCounts,
    writer: &mut StageWriter,
) -> Result<u64, GenerateError> {
    let mut written = 0;
    for filled in rule.fill_board(board, counts)? {
        writeln!(writer.inner, "{filled}")?;
        written += 1;
    }
    Ok(written)
}

/// Rewrites the stage file keeping one line in every `shard.count`.
fn filter_shard(path: &Path, shard: Shard) -> Result<u64, GenerateError> {
    let content = fs::read_to_string(path)?;
    let mut writer = StageWriter::create(path)?;
    let mut count = 0;
    for (i, line) in content.lines().enumerate() {
        if i % shard.count == shard.index {
            writeln!(writer.inner, "{line}")?;
            count += 1;
        }
    }
    writer.commit()?;
    Ok(count)
}

/// A stage's temporary board file, removed when the guard drops.
struct StageFile {
    path: PathBuf,
}

// Distinguishes stage files of concurrent runs within one process, such
// as rayon shard fan-outs; the pid distinguishes processes.
static STAGE_FILE_ID: AtomicU64 = AtomicU64::new(0);

impl StageFile {
    fn new(stage: usize) -> Self {
        let id = STAGE_FILE_ID.fetch_add(1, Ordering::Relaxed);
        let name = format!("skysearch-{}-{id}-stage{stage}.boards", process::id());
        Self {
            path: env::temp_dir().join(name),
        }
    }
}

impl Drop for StageFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        let _ = fs::remove_file(partial_path(&self.path));
    }
}

/// Buffered writer that lands at `path` only on [`commit`](Self::commit).
///
/// Writes go to a `.partial` sibling so a crashed run never leaves a
/// truncated board file under the final name.
struct StageWriter {
    inner: BufWriter<File>,
    partial: PathBuf,
    path: PathBuf,
}

impl StageWriter {
    fn create(path: &Path) -> io::Result<Self> {
        let partial = partial_path(path);
        let inner = BufWriter::new(File::create(&partial)?);
        Ok(Self {
            inner,
            partial,
            path: path.to_path_buf(),
        })
    }

    fn commit(mut self) -> io::Result<()> {
        self.inner.flush()?;
        fs::rename(&self.partial, &self.path)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

/// Reads a stage file back in bounded chunks.
struct ChunkedBoards {
    reader: BufReader<File>,
    chunk_size: usize,
    done: bool,
}

impl ChunkedBoards {
    fn open(path: &Path, chunk_size: Option<usize>) -> io::Result<Self> {
        Ok(Self {
            reader: BufReader::new(File::open(path)?),
            chunk_size: chunk_size.unwrap_or(usize::MAX),
            done: false,
        })
    }

    /// Returns up to `chunk_size` boards, or `None` at end of file.
    fn next_chunk(&mut self) -> Result<Option<Vec<Board>>, GenerateError> {
        if self.done {
            return Ok(None);
        }
        let mut boards = Vec::new();
        let mut line = String::new();
        while boards.len() < self.chunk_size {
            line.clear();
            let read = self.reader.read_line(&mut line)?;
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if read == 0 || trimmed.is_empty() {
                self.done = true;
                break;
            }
            boards.push(trimmed.parse()?);
        }
        if boards.is_empty() && self.done {
            return Ok(None);
        }
        Ok(Some(boards))
    }
}

/// Logs coarse progress through a stage.
struct Progress {
    total: u64,
    current: u64,
    last_percent: u64,
}

impl Progress {
    fn new(total: u64) -> Self {
        Self {
            total,
            current: 0,
            last_percent: 0,
        }
    }

    fn step(&mut self) {
        self.current += 1;
        if self.total == 0 {
            return;
        }
        let percent = self.current * 100 / self.total;
        if percent / 10 > self.last_percent / 10 {
            info!("{percent}% of stage inputs processed");
            self.last_percent = percent;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use skysearch_core::SpaceObject;
    use skysearch_rules::{Qualifier, combin};

    use super::*;

    fn tiny_type() -> BoardType {
        use SpaceObject::{Asteroid, Comet, Empty};

        BoardType::new(
            ObjectCounts::from_pairs(&[(Comet, 2), (Asteroid, 2), (Empty, 2)]),
            vec![
                Rule::comet(6),
                Rule::adjacent_self(Asteroid, Qualifier::Every),
            ],
        )
    }

    fn brute_force(board_type: &BoardType) -> BTreeSet<Board> {
        let counts = board_type
            .counts()
            .iter()
            .map(|(object, count)| (Some(object), count))
            .collect::<Vec<_>>();
        combin::multiset_permutations(&counts)
            .into_iter()
            .map(|objects| Board::from_objects(&objects))
            .filter(|board| board_type.check(board))
            .collect()
    }

    fn unique_output(tag: &str) -> PathBuf {
        let name = format!("skysearch-test-{}-{tag}.boards", process::id());
        env::temp_dir().join(name)
    }

    fn read_boards(path: &Path) -> BTreeSet<Board> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| line.parse().unwrap())
            .collect()
    }

    #[test]
    fn generate_all_matches_brute_force() {
        let board_type = tiny_type();
        let generated = board_type.generate_all().unwrap();
        let unique = generated.iter().cloned().collect::<BTreeSet<_>>();
        assert_eq!(unique.len(), generated.len(), "duplicate boards generated");
        assert_eq!(unique, brute_force(&board_type));
    }

    #[test]
    fn generate_to_file_matches_in_memory_run() {
        let board_type = tiny_type();
        let output = unique_output("file");
        let config = GenerateConfig {
            chunk_size: Some(2),
            shard: None,
        };
        let report = board_type.generate_to_file(&output, &config).unwrap();
        let from_file = read_boards(&output);
        fs::remove_file(&output).unwrap();

        assert_eq!(report.num_boards, from_file.len() as u64);
        assert_eq!(report.stage_counts.len(), board_type.rules().len());
        let in_memory = board_type
            .generate_all()
            .unwrap()
            .into_iter()
            .collect::<BTreeSet<_>>();
        assert_eq!(from_file, in_memory);
    }

    #[test]
    fn shards_partition_the_board_set() {
        let board_type = tiny_type();
        let mut union = BTreeSet::new();
        let mut total = 0;
        for index in 0..3 {
            let output = unique_output(&format!("shard{index}"));
            let config = GenerateConfig {
                chunk_size: None,
                shard: Shard::new(index, 3),
            };
            board_type.generate_to_file(&output, &config).unwrap();
            let boards = read_boards(&output);
            fs::remove_file(&output).unwrap();
            total += boards.len();
            union.extend(boards);
        }
        assert_eq!(total, union.len(), "shards overlap");
        assert_eq!(union, brute_force(&board_type));
    }

    #[test]
    fn standard_12_pipeline_emits_valid_boards() {
        let board_type = BoardType::standard(12).unwrap();
        let boards = board_type.generate_all().unwrap();
        assert!(!boards.is_empty());
        for board in &boards {
            assert!(board.is_complete(), "incomplete board {board}");
            assert_eq!(board.num_objects(), *board_type.counts());
            assert!(board_type.check(board), "invalid board {board}");
        }
    }

    #[test]
    fn unfillable_rule_fails_the_run() {
        use SpaceObject::{Empty, GasCloud};

        let board_type = BoardType::new(
            ObjectCounts::from_pairs(&[(GasCloud, 1), (Empty, 3)]),
            vec![Rule::adjacent(GasCloud, Empty, Qualifier::AtLeastOne)],
        );
        assert!(matches!(
            board_type.generate_all(),
            Err(FillError::UnsupportedQualifier {
                qualifier: Qualifier::AtLeastOne,
            }),
        ));
    }

    #[test]
    fn shard_rejects_out_of_range_index() {
        assert_eq!(Shard::new(3, 3), None);
        assert_eq!(Shard::new(4, 3), None);
        let shard = Shard::new(2, 3).unwrap();
        assert_eq!(shard.index(), 2);
        assert_eq!(shard.count(), 3);
    }

    #[test]
    fn stage_files_get_distinct_paths() {
        let first = StageFile::new(2);
        let second = StageFile::new(2);
        assert_ne!(first.path, second.path);
    }

    #[test]
    fn stage_files_are_removed_on_drop() {
        let stage = StageFile::new(9);
        fs::write(&stage.path, "------\n").unwrap();
        let path = stage.path.clone();
        drop(stage);
        assert!(!path.exists());
    }

    #[test]
    fn chunked_reader_stops_at_blank_line() {
        let path = unique_output("chunks");
        fs::write(&path, "C-AA--\nCC--A-\n\n--AA-C\n").unwrap();
        let mut chunks = ChunkedBoards::open(&path, Some(1)).unwrap();
        let mut seen = Vec::new();
        while let Some(boards) = chunks.next_chunk().unwrap() {
            seen.extend(boards);
        }
        fs::remove_file(&path).unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].to_string(), "C-AA--");
    }
}
