use std::{
    ops::{Index, IndexMut},
    slice,
    vec,
};

use crate::format::M3uEntry;

/// An ordered list of entries, the order is the order of the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct M3uPlaylist {
    entries: Vec<M3uEntry>,
}

impl M3uPlaylist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&M3uEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut M3uEntry> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, M3uEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, M3uEntry> {
        self.entries.iter_mut()
    }

    pub fn add(&mut self, entry: M3uEntry) {
        self.entries.push(entry);
    }

    /// Panics if `index > len`, like [`Vec::insert`]
    pub fn insert(&mut self, index: usize, entry: M3uEntry) {
        self.entries.insert(index, entry);
    }

    pub fn remove(&mut self, index: usize) -> Option<M3uEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Remove the first entry equal to `entry`
    pub fn remove_entry(&mut self, entry: &M3uEntry) -> bool {
        match self.entries.iter().position(|x| x == entry) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Swap the entry at `index` for `entry`, keeping its position.
    /// Returns the old entry, or `None` when `index` is out of range.
    pub fn replace(&mut self, index: usize, entry: M3uEntry) -> Option<M3uEntry> {
        self.entries
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, entry))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, entry: &M3uEntry) -> bool {
        self.entries.contains(entry)
    }

    pub fn find(&self, predicate: impl Fn(&M3uEntry) -> bool) -> Option<&M3uEntry> {
        self.entries.iter().find(|x| predicate(*x))
    }

    pub fn find_all(&self, predicate: impl Fn(&M3uEntry) -> bool) -> Vec<&M3uEntry> {
        self.entries.iter().filter(|x| predicate(*x)).collect()
    }

    /// Index of the first matching entry, usable with [`M3uPlaylist::replace`]
    pub fn position(&self, predicate: impl Fn(&M3uEntry) -> bool) -> Option<usize> {
        self.entries.iter().position(predicate)
    }
}

impl Index<usize> for M3uPlaylist {
    type Output = M3uEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl IndexMut<usize> for M3uPlaylist {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.entries[index]
    }
}

impl IntoIterator for M3uPlaylist {
    type Item = M3uEntry;
    type IntoIter = vec::IntoIter<M3uEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a M3uPlaylist {
    type Item = &'a M3uEntry;
    type IntoIter = slice::Iter<'a, M3uEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a mut M3uPlaylist {
    type Item = &'a mut M3uEntry;
    type IntoIter = slice::IterMut<'a, M3uEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter_mut()
    }
}

impl FromIterator<M3uEntry> for M3uPlaylist {
    fn from_iter<T: IntoIterator<Item = M3uEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<M3uEntry> for M3uPlaylist {
    fn extend<T: IntoIterator<Item = M3uEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use crate::format::{M3uEntry, M3uPlaylist, Reference};

    fn entry(title: &str, seconds: u64) -> M3uEntry {
        M3uEntry::new(
            Duration::from_secs(seconds),
            title,
            Reference::Path(PathBuf::from(format!("{}.mp3", title))),
        )
    }

    #[test]
    fn test_order_and_duplicates() {
        let mut playlist = M3uPlaylist::new();
        playlist.add(entry("A", 1));
        playlist.add(entry("B", 2));
        playlist.add(entry("A", 1));
        playlist.insert(1, entry("C", 3));

        let titles = playlist.iter().map(|x| x.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["A", "C", "B", "A"]);
        assert_eq!(playlist[0], playlist[3]);
    }

    #[test]
    fn test_remove() {
        let mut playlist: M3uPlaylist = [entry("A", 1), entry("B", 2), entry("A", 1)]
            .into_iter()
            .collect();

        assert!(playlist.remove_entry(&entry("A", 1)));
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist[0].title, "B");
        assert!(!playlist.remove_entry(&entry("Z", 1)));

        assert!(playlist.remove(5).is_none());
        assert_eq!(playlist.remove(0).unwrap().title, "B");

        playlist.clear();
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut playlist: M3uPlaylist = [entry("A", 1), entry("B", 2), entry("C", 3)]
            .into_iter()
            .collect();

        let index = playlist.position(|x| x.title == "B").unwrap();
        let old = playlist.replace(index, entry("D", 4)).unwrap();

        assert_eq!(old.title, "B");
        assert_eq!(playlist[1].title, "D");
        assert_eq!(playlist.len(), 3);
        assert!(playlist.replace(3, entry("E", 5)).is_none());
        assert!(!playlist.contains(&entry("E", 5)));
    }

    #[test]
    fn test_find() {
        let playlist: M3uPlaylist = [entry("A", 10), entry("B", 200), entry("C", 300)]
            .into_iter()
            .collect();

        assert_eq!(
            playlist
                .find(|x| x.duration > Duration::from_secs(100))
                .unwrap()
                .title,
            "B"
        );
        assert_eq!(
            playlist
                .find_all(|x| x.duration > Duration::from_secs(100))
                .len(),
            2
        );
        assert!(playlist.find(|x| x.title.is_empty()).is_none());
    }

    #[test]
    fn test_edit_in_place() {
        let mut playlist: M3uPlaylist = [entry("A", 1)].into_iter().collect();
        for it in &mut playlist {
            it.title = "Edited".into();
        }
        playlist[0].duration = Duration::from_secs(9);

        assert_eq!(playlist.get(0).unwrap().title, "Edited");
        assert_eq!(playlist.get(0).unwrap().duration, Duration::from_secs(9));
    }
}
