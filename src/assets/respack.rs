use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::Context;
use quick_xml::Reader;
use quick_xml::events::Event;
use rand::Rng;

use crate::assets::sprite::Sprite;
use crate::foundation::error::{HuesError, HuesResult};

const AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "ogg", "wav"];
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "gif", "jpg", "jpeg"];

/// Horizontal placement of a sprite on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    fn parse(s: &str) -> Align {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Align::Left,
            "right" => Align::Right,
            _ => Align::Center,
        }
    }

    /// X coordinate placing a sprite of `sprite_width` on a canvas of
    /// `canvas_width`.
    pub fn dest_x(self, canvas_width: u32, sprite_width: u32) -> i32 {
        let canvas = canvas_width as i64;
        let sprite = sprite_width as i64;
        let x = match self {
            Align::Left => 0,
            Align::Right => canvas - sprite,
            Align::Center => (canvas - sprite) / 2,
        };
        x as i32
    }
}

/// Image metadata parsed from a respack's XML catalogue.
#[derive(Clone, Debug)]
pub struct ImageEntry {
    pub name: String,
    pub align: Align,
    pub source: Option<String>,
    pub fullname: Option<String>,
}

/// Song metadata parsed from a respack's XML catalogue.
#[derive(Clone, Debug)]
pub struct SongEntry {
    pub name: String,
    pub rhythm: String,
    pub buildup: Option<String>,
    pub buildup_rhythm: Option<String>,
    pub source: Option<String>,
}

/// A song's audio extracted to disk for ffmpeg/ffprobe consumption.
///
/// The extracted files live in a temp directory owned by this value; dropping
/// it removes them.
#[derive(Debug)]
pub struct OpenedSong {
    pub loop_media_path: PathBuf,
    pub buildup_media_path: Option<PathBuf>,
    pub entry: SongEntry,
    _tempdir: tempfile::TempDir,
}

/// One respack zip archive: catalogued audio, images and XML metadata.
#[derive(Debug)]
pub struct ResPack {
    path: PathBuf,
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    audio_files: HashMap<String, String>,
    image_files: HashMap<String, String>,
    images: BTreeMap<String, ImageEntry>,
    songs: BTreeMap<String, SongEntry>,
}

impl ResPack {
    /// Scan a respack archive and parse its XML catalogues.
    ///
    /// Images and songs are only registered when the catalogue entry has a
    /// matching media file in the archive.
    pub fn load(path: impl Into<PathBuf>) -> HuesResult<Self> {
        let path = path.into();
        let file =
            File::open(&path).with_context(|| format!("open respack '{}'", path.display()))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| HuesError::asset(format!("'{}' is not a valid zip: {e}", path.display())))?;

        let mut out = Self {
            path,
            name: None,
            author: None,
            description: None,
            link: None,
            audio_files: HashMap::new(),
            image_files: HashMap::new(),
            images: BTreeMap::new(),
            songs: BTreeMap::new(),
        };

        let mut xml_entries = Vec::<String>::new();
        for idx in 0..archive.len() {
            let entry = archive
                .by_index(idx)
                .map_err(|e| HuesError::asset(format!("cannot read zip entry: {e}")))?;
            let name = entry.name().to_string();
            let Some((stem, ext)) = stem_and_ext(&name) else {
                continue;
            };
            if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
                out.audio_files.insert(stem, name);
            } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                out.image_files.insert(stem, name);
            } else if ext == "xml" {
                xml_entries.push(name);
            }
        }

        for entry_name in xml_entries {
            let mut entry = archive
                .by_name(&entry_name)
                .map_err(|e| HuesError::asset(format!("cannot read zip entry: {e}")))?;
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .with_context(|| format!("read respack xml '{entry_name}'"))?;
            out.parse_xml(&bytes)?;
        }

        tracing::info!(
            respack = %out.path.display(),
            images = out.images.len(),
            songs = out.songs.len(),
            "respack catalogued"
        );
        Ok(out)
    }

    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    pub fn song_names(&self) -> impl Iterator<Item = &str> {
        self.songs.keys().map(String::as_str)
    }

    pub fn has_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn has_song(&self, name: &str) -> bool {
        self.songs.contains_key(name)
    }

    /// Decode the named image into a sprite prepared at `target_height`.
    pub fn open_image(&self, name: &str, target_height: u32) -> HuesResult<(Sprite, &ImageEntry)> {
        let entry = self
            .images
            .get(name)
            .ok_or_else(|| HuesError::asset(format!("no image '{name}'")))?;
        let archive_path = self
            .image_files
            .get(name)
            .ok_or_else(|| HuesError::asset(format!("no image file for '{name}'")))?;

        let bytes = self.read_archive_bytes(archive_path)?;
        let sprite = Sprite::from_bytes(&bytes, target_height)?;
        Ok((sprite, entry))
    }

    /// Extract the named song's audio (loop, plus buildup if declared) to a
    /// temp directory.
    pub fn open_song(&self, name: &str) -> HuesResult<OpenedSong> {
        let entry = self
            .songs
            .get(name)
            .ok_or_else(|| HuesError::asset(format!("no song '{name}'")))?;

        let tempdir = tempfile::tempdir().context("create temp dir for song audio")?;
        let loop_media_path = self.extract_audio(name, tempdir.path())?;
        let buildup_media_path = match &entry.buildup {
            Some(buildup) => Some(self.extract_audio(buildup, tempdir.path())?),
            None => None,
        };

        Ok(OpenedSong {
            loop_media_path,
            buildup_media_path,
            entry: entry.clone(),
            _tempdir: tempdir,
        })
    }

    fn extract_audio(&self, stem: &str, dir: &Path) -> HuesResult<PathBuf> {
        let archive_path = self
            .audio_files
            .get(stem)
            .ok_or_else(|| HuesError::asset(format!("no audio file for '{stem}'")))?;
        let bytes = self.read_archive_bytes(archive_path)?;

        let file_name = Path::new(archive_path)
            .file_name()
            .ok_or_else(|| HuesError::asset(format!("bad audio entry name '{archive_path}'")))?;
        let out_path = dir.join(file_name);
        std::fs::write(&out_path, bytes)
            .with_context(|| format!("extract audio to '{}'", out_path.display()))?;
        Ok(out_path)
    }

    fn read_archive_bytes(&self, entry_name: &str) -> HuesResult<Vec<u8>> {
        let file = File::open(&self.path)
            .with_context(|| format!("open respack '{}'", self.path.display()))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| HuesError::asset(format!("reopen respack zip: {e}")))?;
        let mut entry = archive
            .by_name(entry_name)
            .map_err(|e| HuesError::asset(format!("cannot read zip entry '{entry_name}': {e}")))?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .with_context(|| format!("read zip entry '{entry_name}'"))?;
        Ok(bytes)
    }

    fn parse_xml(&mut self, data: &[u8]) -> HuesResult<()> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut stack = Vec::<String>::new();
        let mut current_image: Option<ImageEntry> = None;
        let mut current_song: Option<SongEntry> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().local_name().as_ref()).to_string();
                    match name.as_str() {
                        "image" if stack.last().is_some_and(|s| s == "images") => {
                            if let Some(entry_name) = name_attribute(&e) {
                                current_image = Some(ImageEntry {
                                    name: entry_name,
                                    align: Align::Center,
                                    source: None,
                                    fullname: None,
                                });
                            }
                        }
                        "song" if stack.last().is_some_and(|s| s == "songs") => {
                            if let Some(entry_name) = name_attribute(&e) {
                                current_song = Some(SongEntry {
                                    name: entry_name,
                                    rhythm: String::new(),
                                    buildup: None,
                                    buildup_rhythm: None,
                                    source: None,
                                });
                            }
                        }
                        _ => {}
                    }
                    stack.push(name);
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .decode()
                        .map_err(|e| HuesError::asset(format!("bad respack xml text: {e}")))?
                        .trim()
                        .to_string();
                    if text.is_empty() {
                        continue;
                    }
                    let field = stack.last().map(String::as_str).unwrap_or("");
                    let parent = stack
                        .len()
                        .checked_sub(2)
                        .map(|i| stack[i].as_str())
                        .unwrap_or("");
                    self.assign_text(
                        parent,
                        field,
                        text,
                        current_image.as_mut(),
                        current_song.as_mut(),
                    );
                }
                Ok(Event::End(_)) => {
                    let closed = stack.pop();
                    match closed.as_deref() {
                        Some("image") => {
                            if let Some(entry) = current_image.take()
                                && self.image_files.contains_key(&entry.name)
                            {
                                self.images.insert(entry.name.clone(), entry);
                            }
                        }
                        Some("song") => {
                            if let Some(entry) = current_song.take()
                                && self.audio_files.contains_key(&entry.name)
                            {
                                self.songs.insert(entry.name.clone(), entry);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(HuesError::asset(format!("malformed respack xml: {e}")));
                }
            }
            buf.clear();
        }
        Ok(())
    }

    fn assign_text(
        &mut self,
        parent: &str,
        field: &str,
        text: String,
        image: Option<&mut ImageEntry>,
        song: Option<&mut SongEntry>,
    ) {
        match parent {
            "info" => match field {
                "name" => self.name = Some(text),
                "author" => self.author = Some(text),
                "description" => self.description = Some(text),
                "link" => self.link = Some(text),
                _ => {}
            },
            "image" => {
                if let Some(entry) = image {
                    match field {
                        "align" => entry.align = Align::parse(&text),
                        "source" => entry.source = Some(text),
                        "fullname" => entry.fullname = Some(text),
                        _ => {}
                    }
                }
            }
            "song" => {
                if let Some(entry) = song {
                    match field {
                        "rhythm" => entry.rhythm = text,
                        "buildup" => entry.buildup = Some(text),
                        "buildupRhythm" => entry.buildup_rhythm = Some(text),
                        "source" => entry.source = Some(text),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}

/// Aggregated catalogue over one or more respacks.
#[derive(Debug)]
pub struct Resources {
    packs: Vec<ResPack>,
}

impl Resources {
    pub fn load(paths: &[PathBuf]) -> HuesResult<Self> {
        if paths.is_empty() {
            return Err(HuesError::validation("at least one respack is required"));
        }
        let packs = paths
            .iter()
            .map(ResPack::load)
            .collect::<HuesResult<Vec<_>>>()?;
        Ok(Self::from_packs(packs))
    }

    pub fn from_packs(packs: Vec<ResPack>) -> Self {
        Self { packs }
    }

    pub fn list_images(&self) -> Vec<&str> {
        self.packs.iter().flat_map(ResPack::image_names).collect()
    }

    pub fn list_songs(&self) -> Vec<&str> {
        self.packs.iter().flat_map(ResPack::song_names).collect()
    }

    pub fn open_image(&self, name: &str, target_height: u32) -> HuesResult<(Sprite, &ImageEntry)> {
        self.packs
            .iter()
            .find(|p| p.has_image(name))
            .ok_or_else(|| HuesError::asset(format!("no image '{name}' in any respack")))?
            .open_image(name, target_height)
    }

    pub fn open_random_image(
        &self,
        rng: &mut impl Rng,
        target_height: u32,
    ) -> HuesResult<(Sprite, &ImageEntry)> {
        let names = self.list_images();
        if names.is_empty() {
            return Err(HuesError::asset("respacks contain no images"));
        }
        let name = names[rng.random_range(0..names.len())];
        self.open_image(name, target_height)
    }

    pub fn open_song(&self, name: &str) -> HuesResult<OpenedSong> {
        self.packs
            .iter()
            .find(|p| p.has_song(name))
            .ok_or_else(|| HuesError::asset(format!("no song '{name}' in any respack")))?
            .open_song(name)
    }
}

fn stem_and_ext(entry_name: &str) -> Option<(String, String)> {
    let path = Path::new(entry_name);
    let stem = path.file_stem()?.to_str()?.to_string();
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some((stem, ext))
}

fn name_attribute(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        (attr.key.local_name().as_ref() == b"name")
            .then(|| String::from_utf8_lossy(&attr.value).to_string())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/respack.rs"]
mod tests;
