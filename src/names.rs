//! Remembering the name the player joined with, so a reconnecting client can
//! pick its seat again.

use std::fs;
use std::io;
use std::path::PathBuf;

use rand::Rng;
use rand::seq::SliceRandom;

pub trait NameStore {
    fn get(&self) -> Option<String>;
    fn set(&mut self, name: &str);
    fn clear(&mut self);
}

impl<S: NameStore + ?Sized> NameStore for Box<S> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }
    fn set(&mut self, name: &str) {
        (**self).set(name)
    }
    fn clear(&mut self) {
        (**self).clear()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryNameStore(Option<String>);

impl MemoryNameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: &str) -> Self {
        Self(Some(name.to_owned()))
    }
}

impl NameStore for MemoryNameStore {
    fn get(&self) -> Option<String> {
        self.0.clone()
    }
    fn set(&mut self, name: &str) {
        self.0 = Some(name.to_owned())
    }
    fn clear(&mut self) {
        self.0 = None
    }
}

/// The name in a plain text file. Failing to read or write it only loses the name.
#[derive(Debug, Clone)]
pub struct FileNameStore {
    path: PathBuf,
}

impl FileNameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NameStore for FileNameStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let name = content.trim();
                if name.is_empty() {
                    None
                } else {
                    Some(name.to_owned())
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("cannot read stored name from {}: {}", self.path.display(), e);
                None
            },
        }
    }

    fn set(&mut self, name: &str) {
        if let Err(e) = fs::write(&self.path, name) {
            log::warn!("cannot store name in {}: {}", self.path.display(), e);
        }
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => (),
            Err(e) if e.kind() == io::ErrorKind::NotFound => (),
            Err(e) => log::warn!("cannot remove stored name {}: {}", self.path.display(), e),
        }
    }
}

const CONSONANTS: &[u8] = b"bcdfghjklmnpqrstvwxyz";
const VOWELS: &[u8] = b"aeiou";

/// A pronounceable made up name such as `Tobaxeg`, mostly short
pub fn random_name(rng: &mut impl Rng) -> String {
    let mut name = String::new();
    name.push(pick(rng, CONSONANTS).to_ascii_uppercase());

    let length_seed: f64 = rng.gen();
    let mut i = 0;
    while i <= 5 && length_seed < 1.0 / 1.7f64.powi(i) {
        let vowel = pick(rng, VOWELS);
        name.push(vowel);
        if rng.gen_bool(0.1) {
            name.push(vowel);
        }
        name.push(pick(rng, CONSONANTS));
        i += 1;
    }
    name
}

fn pick(rng: &mut impl Rng, set: &[u8]) -> char {
    *set.choose(rng).unwrap_or(&b'x') as char
}


#[test]
fn random_names_look_like_names() {
    use rand::SeedableRng;

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let name = random_name(&mut rng);
        let mut chars = name.chars();
        let first = chars.next().unwrap();
        assert!(first.is_ascii_uppercase());
        assert!(chars.all(|c| c.is_ascii_lowercase()));
        assert!(name.len() >= 3 && name.len() <= 1 + 6 * 4, "{}", name);
    }
}

#[test]
fn memory_store() {
    let mut store = MemoryNameStore::new();
    assert_eq!(store.get(), None);
    store.set("Ada");
    assert_eq!(store.get().as_deref(), Some("Ada"));
    store.clear();
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_survives_a_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("name");
    let mut store = FileNameStore::new(&path);
    assert_eq!(store.get(), None);
    store.clear();
    store.set("Ada");
    assert_eq!(FileNameStore::new(&path).get().as_deref(), Some("Ada"));
    store.clear();
    assert_eq!(store.get(), None);
}
