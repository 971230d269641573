//! Kompakter Property-Store
//!
//! Key-Value-Records (i16 → Bytes) liegen lückenlos hintereinander in einem
//! einzigen Buffer und werden als Ganzes in einen [`ByteStore`] geschrieben.
//!
//! # Layout (little-endian)
//! ```text
//! Image:  [count: u16][size: u16][record]*count
//! Record: [propertyId: i16][valueSize: u16][value: valueSize Bytes]
//! ```
//!
//! Es werden keine Zeiger oder Offsets zwischengespeichert: jeder Zugriff
//! läuft die Header ab Buffer-Anfang ab. Reallokationen können dadurch
//! nichts invalidieren.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use crate::config::{DEFAULT_BASE_OFFSET, IMAGE_HEADER_LEN, MAX_PROPERTIES, RECORD_HEADER_LEN};
use crate::traits::ByteStore;

/// Fehler-Typ für Property-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    /// Maximale Anzahl Properties erreicht
    Full,
    /// Wert oder Gesamt-Image passt nicht in das 16-Bit Größenfeld
    TooLarge { requested: usize },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "property store is full ({} records max)", MAX_PROPERTIES - 1),
            Self::TooLarge { requested } => {
                write!(f, "property image of {requested} bytes exceeds 16-bit size field")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PropertyError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Full => defmt::write!(fmt, "Full"),
            Self::TooLarge { requested } => {
                defmt::write!(fmt, "TooLarge {{ requested: {} }}", requested)
            }
        }
    }
}

/// Lesender Zugriff auf ein Record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property<'a> {
    id: i16,
    value: &'a [u8],
}

impl<'a> Property<'a> {
    pub fn id(&self) -> i16 {
        self.id
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Länge inklusive Record-Header
    pub fn record_len(&self) -> usize {
        RECORD_HEADER_LEN + self.value.len()
    }
}

/// Position eines Records im Buffer
#[derive(Debug, Clone, Copy)]
struct Slot {
    offset: usize,
    value_len: usize,
}

impl Slot {
    fn record_range(&self) -> Range<usize> {
        self.offset..self.offset + RECORD_HEADER_LEN + self.value_len
    }

    fn value_range(&self) -> Range<usize> {
        self.offset + RECORD_HEADER_LEN..self.offset + RECORD_HEADER_LEN + self.value_len
    }
}

/// Liest den Record-Header an `offset`, None wenn der Header abgeschnitten ist
fn read_header(buf: &[u8], offset: usize) -> Option<(i16, usize)> {
    let header = buf.get(offset..offset + RECORD_HEADER_LEN)?;
    let id = i16::from_le_bytes([header[0], header[1]]);
    let value_len = usize::from(u16::from_le_bytes([header[2], header[3]]));
    Some((id, value_len))
}

/// Iterator über alle Records in Speicher-Reihenfolge
pub struct Properties<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Properties<'a> {
    type Item = Property<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, value_len) = read_header(self.buf, self.offset)?;
        let start = self.offset + RECORD_HEADER_LEN;
        let value = self.buf.get(start..start + value_len)?;
        self.offset = start + value_len;
        Some(Property { id, value })
    }
}

/// Prüft ob `buf` aus genau `count` vollständigen Records besteht
fn is_consistent(buf: &[u8], count: u16) -> bool {
    let mut offset = 0;
    for _ in 0..count {
        match read_header(buf, offset) {
            Some((_, value_len)) if offset + RECORD_HEADER_LEN + value_len <= buf.len() => {
                offset += RECORD_HEADER_LEN + value_len;
            }
            _ => return false,
        }
    }
    offset == buf.len()
}

/// Kopiert bis zu N Bytes little-endian, fehlende Bytes bleiben 0
fn le_bytes<const N: usize>(value: &[u8]) -> [u8; N] {
    let mut raw = [0u8; N];
    let len = value.len().min(N);
    raw[..len].copy_from_slice(&value[..len]);
    raw
}

/// Property-Store über einem persistenten ByteStore
///
/// # Trait-basierte Abstraktion
/// - **Production:** [`crate::At24`] (I2C EEPROM)
/// - **Testing:** [`crate::MemoryStore`]
pub struct PropertyStore<S> {
    store: S,
    base_offset: u16,
    initial_capacity: usize,
    buf: Vec<u8>,
    count: u16,
}

impl<S: ByteStore> PropertyStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            base_offset: DEFAULT_BASE_OFFSET,
            initial_capacity: 0,
            buf: Vec::new(),
            count: 0,
        }
    }

    /// Startadresse des Images im persistenten Speicher
    pub fn with_base_offset(mut self, base_offset: u16) -> Self {
        self.base_offset = base_offset;
        self
    }

    /// Mindestgröße der ersten Allokation nach leerem Store
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn base_offset(&self) -> u16 {
        self.base_offset
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Gibt den ByteStore zurück (z.B. um den Inhalt zu prüfen)
    pub fn into_store(self) -> S {
        self.store
    }

    /// Anzahl Records
    pub fn len(&self) -> usize {
        usize::from(self.count)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Logische Größe aller Records in Bytes (Header + Werte)
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Physisch allokierte Bytes
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn iter(&self) -> Properties<'_> {
        Properties {
            buf: &self.buf,
            offset: 0,
        }
    }

    // ========================================================================
    // Persistenz
    // ========================================================================

    /// Lädt das Image ab der konfigurierten Startadresse
    ///
    /// Der aktuelle Inhalt wird immer verworfen. Gibt `Ok(false)` zurück, wenn
    /// kein gültiges Image gefunden wurde (Store bleibt dann leer).
    pub fn load(&mut self) -> Result<bool, S::Error> {
        self.flush();

        let mut header = [0u8; IMAGE_HEADER_LEN];
        self.store.read_bytes(self.base_offset, &mut header)?;
        let count = u16::from_le_bytes([header[0], header[1]]);
        let size = usize::from(u16::from_le_bytes([header[2], header[3]]));

        if count == 0 || count >= MAX_PROPERTIES {
            debug!("No property image at {} (count {})", self.base_offset, count);
            return Ok(false);
        }

        // Records hinter 0xFFFF sind nicht adressierbar
        let Some(data_offset) = self.data_offset() else {
            warn!("Property image at {} has no room for records", self.base_offset);
            return Ok(false);
        };

        let mut buf = vec![0u8; size];
        if size > 0 {
            self.store.read_bytes(data_offset, &mut buf)?;
        }

        if !is_consistent(&buf, count) {
            warn!(
                "Corrupt property image at {}: {} records, {} bytes",
                self.base_offset,
                count,
                size
            );
            return Ok(false);
        }

        info!("Properties loaded: {} records, {} bytes", count, size);
        self.buf = buf;
        self.count = count;
        Ok(true)
    }

    /// Setzt die Startadresse und lädt
    pub fn load_from(&mut self, position: u16) -> Result<bool, S::Error> {
        self.base_offset = position;
        self.load()
    }

    /// Schreibt Header und alle Records an die konfigurierte Startadresse
    ///
    /// Ob der Zielbereich groß genug ist, prüft nur der ByteStore selbst.
    pub fn save(&mut self) -> Result<(), S::Error> {
        // size passt immer in u16 (siehe ensure_fits)
        let size = self.buf.len() as u16;

        let mut header = [0u8; IMAGE_HEADER_LEN];
        header[..2].copy_from_slice(&self.count.to_le_bytes());
        header[2..].copy_from_slice(&size.to_le_bytes());

        match self.data_offset() {
            Some(data_offset) => {
                self.store.write_bytes(self.base_offset, &header)?;
                if !self.buf.is_empty() {
                    self.store.write_bytes(data_offset, &self.buf)?;
                }
            }
            // Records lägen hinter 0xFFFF: ein einziger Zugriff, den der
            // ByteStore gegen seine Kapazität prüft
            None => {
                let mut image = Vec::with_capacity(IMAGE_HEADER_LEN + self.buf.len());
                image.extend_from_slice(&header);
                image.extend_from_slice(&self.buf);
                self.store.write_bytes(self.base_offset, &image)?;
            }
        }

        info!("Properties saved: {} records, {} bytes", self.count, size);
        Ok(())
    }

    /// Setzt die Startadresse und speichert
    pub fn save_to(&mut self, position: u16) -> Result<(), S::Error> {
        self.base_offset = position;
        self.save()
    }

    /// Adresse des ersten Records, None wenn sie nicht in 16 Bit passt
    fn data_offset(&self) -> Option<u16> {
        self.base_offset.checked_add(IMAGE_HEADER_LEN as u16)
    }

    // ========================================================================
    // Records
    // ========================================================================

    fn locate(&self, id: i16) -> Option<Slot> {
        let mut offset = 0;
        for _ in 0..self.count {
            let (record_id, value_len) = read_header(&self.buf, offset)?;
            if record_id == id {
                return Some(Slot { offset, value_len });
            }
            offset += RECORD_HEADER_LEN + value_len;
        }
        None
    }

    /// True wenn ein Record mit dieser ID existiert
    pub fn find_property(&self, id: i16) -> bool {
        self.locate(id).is_some()
    }

    /// Stellt sicher, dass ein Record `id` mit genau `size` Bytes existiert
    ///
    /// - gleiche Größe: der bestehende Wert bleibt an seiner Position
    /// - andere Größe: Record wird entfernt und am Ende neu angelegt
    /// - neu: Record wird am Ende mit Nullen angelegt
    ///
    /// Gibt den (veränderbaren) Wert zurück.
    pub fn add_property(&mut self, id: i16, size: usize) -> Result<&mut [u8], PropertyError> {
        let existing = self.locate(id);

        if let Some(slot) = existing
            && slot.value_len == size
        {
            return Ok(&mut self.buf[slot.value_range()]);
        }

        let freed = existing.map_or(0, |slot| RECORD_HEADER_LEN + slot.value_len);
        self.ensure_fits(size, freed)?;
        if existing.is_none() && self.count + 1 >= MAX_PROPERTIES {
            return Err(PropertyError::Full);
        }

        if let Some(slot) = existing {
            self.remove_slot(slot);
        }
        Ok(self.append(id, size))
    }

    fn ensure_fits(&self, size: usize, freed: usize) -> Result<(), PropertyError> {
        let limit = usize::from(u16::MAX);
        if size > limit {
            return Err(PropertyError::TooLarge { requested: size });
        }
        // buf.len() <= u16::MAX und size <= u16::MAX: kein Überlauf
        let requested = self.buf.len() - freed + RECORD_HEADER_LEN + size;
        if requested > limit {
            return Err(PropertyError::TooLarge { requested });
        }
        Ok(())
    }

    fn append(&mut self, id: i16, size: usize) -> &mut [u8] {
        let record_len = RECORD_HEADER_LEN + size;
        if self.buf.is_empty() {
            self.buf.reserve_exact(record_len.max(self.initial_capacity));
        } else {
            self.buf.reserve_exact(record_len);
        }

        let offset = self.buf.len();
        self.buf.extend_from_slice(&id.to_le_bytes());
        // size <= u16::MAX (ensure_fits)
        self.buf.extend_from_slice(&(size as u16).to_le_bytes());
        self.buf.resize(offset + record_len, 0);
        self.count += 1;

        trace!("Property {} appended at {} ({} bytes)", id, offset, size);
        &mut self.buf[offset + RECORD_HEADER_LEN..]
    }

    /// Schreibt einen Wert (Größe darf sich ändern)
    pub fn set(&mut self, id: i16, value: &[u8]) -> Result<(), PropertyError> {
        self.add_property(id, value.len())?.copy_from_slice(value);
        Ok(())
    }

    /// Schreibt einen 16-Bit Integer (2 Bytes)
    pub fn set_int(&mut self, id: i16, value: i16) -> Result<(), PropertyError> {
        self.set(id, &value.to_le_bytes())
    }

    /// Schreibt einen 32-Bit Integer (4 Bytes)
    pub fn set_long(&mut self, id: i16, value: i32) -> Result<(), PropertyError> {
        self.set(id, &value.to_le_bytes())
    }

    /// Entfernt ein Record; unbekannte IDs werden ignoriert
    ///
    /// Alle folgenden Records rücken in einem Block nach vorne. Wird der Store
    /// dabei leer, wird auch die Allokation freigegeben.
    pub fn remove(&mut self, id: i16) -> bool {
        match self.locate(id) {
            Some(slot) => {
                self.remove_slot(slot);
                true
            }
            None => false,
        }
    }

    fn remove_slot(&mut self, slot: Slot) {
        self.buf.drain(slot.record_range());
        self.count -= 1;
        if self.buf.is_empty() {
            self.flush();
        }
    }

    /// Verwirft alle Records und gibt den Buffer frei
    pub fn flush(&mut self) {
        self.buf = Vec::new();
        self.count = 0;
    }

    pub fn get(&self, id: i16) -> Option<Property<'_>> {
        self.locate(id).map(|slot| Property {
            id,
            value: &self.buf[slot.value_range()],
        })
    }

    /// Liest die ersten 2 Bytes als i16 (kürzere Werte werden mit 0 aufgefüllt)
    pub fn get_int(&self, id: i16) -> Option<i16> {
        self.get(id)
            .map(|property| i16::from_le_bytes(le_bytes(property.value())))
    }

    /// Liest die ersten 4 Bytes als i32 (kürzere Werte werden mit 0 aufgefüllt)
    pub fn get_long(&self, id: i16) -> Option<i32> {
        self.get(id)
            .map(|property| i32::from_le_bytes(le_bytes(property.value())))
    }
}
