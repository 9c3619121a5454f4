use crate::card::{ReducedCard, StoredFile};
use crate::error::FetchError;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Cards collected so far, in arrival order, unique by id.
#[derive(Debug, Default)]
pub struct Accumulator {
    cards: Vec<ReducedCard>,
    seen: HashSet<String>,
}

/// What was found at the output path before the run.
#[derive(Debug)]
pub enum PriorState {
    Missing,
    Loaded(Accumulator),
    Unreadable(String),
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<ReducedCard>) -> Self {
        let mut accumulator = Accumulator::new();
        accumulator.extend(cards);
        accumulator
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn cards(&self) -> &[ReducedCard] {
        &self.cards
    }

    /// Appends the cards whose id hasn't been seen yet and returns how many
    /// made it in.
    pub fn extend<I>(&mut self, cards: I) -> usize
    where
        I: IntoIterator<Item = ReducedCard>,
    {
        let before = self.cards.len();
        for card in cards {
            if card.id.is_empty() || self.seen.contains(&card.id) {
                continue;
            }
            self.seen.insert(card.id.clone());
            self.cards.push(card);
        }
        self.cards.len() - before
    }

    /// First page worth requesting, assuming the remote keeps a stable order.
    pub fn start_page(&self, page_size: u32) -> u32 {
        let page_size = page_size.max(1) as usize;
        (self.cards.len() / page_size) as u32 + 1
    }

    pub fn load(path: &Path) -> PriorState {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return PriorState::Missing,
            Err(e) => return PriorState::Unreadable(e.to_string()),
        };
        match serde_json::from_reader::<_, StoredFile>(BufReader::new(file)) {
            Ok(stored) => PriorState::Loaded(Accumulator::from_cards(
                stored.data.iter().filter_map(ReducedCard::from_stored).collect(),
            )),
            Err(e) => PriorState::Unreadable(e.to_string()),
        }
    }

    /// Rewrites the whole file as `{ "data": [...] }`, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<(), FetchError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| FetchError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &CardFileRef { data: &self.cards })
            .map_err(|e| FetchError::io(path, e.into()))?;
        writer.flush().map_err(|e| FetchError::io(path, e))?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct CardFileRef<'a> {
    data: &'a [ReducedCard],
}
