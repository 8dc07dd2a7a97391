//! Classic libpcap capture reader.
//!
//! Extracts per-packet signals from a `.pcap` file:
//! - group identifiers from the radiotap A-MPDU status field (link type 127)
//! - arrival timestamps from the record headers, relative to the first packet
//!
//! PCAPNG files are recognised and rejected.

use super::signal::{GroupedSignal, SignalKind, SignalSequence, TimedSignal};
use crate::utils::error::ParseError;
use log::{debug, warn};

const PCAP_MAGIC_MICROS: u32 = 0xa1b2_c3d4;
const PCAP_MAGIC_NANOS: u32 = 0xa1b2_3c4d;
const PCAPNG_MAGIC: u32 = 0x0a0d_0d0a;

const GLOBAL_HEADER_LEN: usize = 24;
const RECORD_HEADER_LEN: usize = 16;

pub const LINKTYPE_IEEE802_11_RADIOTAP: u32 = 127;

const RADIOTAP_AMPDU_STATUS_BIT: usize = 20;
const RADIOTAP_EXT_BIT: u32 = 1 << 31;

// (alignment, size) of the radiotap fields preceding the A-MPDU status field
const RADIOTAP_FIELDS: [(usize, usize); RADIOTAP_AMPDU_STATUS_BIT] = [
    (8, 8), // TSFT
    (1, 1), // flags
    (1, 1), // rate
    (2, 4), // channel
    (2, 2), // FHSS
    (1, 1), // antenna signal (dBm)
    (1, 1), // antenna noise (dBm)
    (2, 2), // lock quality
    (2, 2), // TX attenuation
    (2, 2), // TX attenuation (dB)
    (1, 1), // TX power (dBm)
    (1, 1), // antenna
    (1, 1), // antenna signal (dB)
    (1, 1), // antenna noise (dB)
    (2, 2), // RX flags
    (2, 2), // TX flags
    (1, 1), // RTS retries
    (1, 1), // data retries
    (4, 8), // XChannel
    (1, 3), // MCS
];
const AMPDU_STATUS_ALIGN: usize = 4;

/// Global header of a pcap file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcapHeader {
    pub little_endian: bool,
    pub nanosecond_timestamps: bool,
    pub link_type: u32,
}

/// One captured packet
#[derive(Debug, Clone, Copy)]
pub struct PcapRecord<'a> {
    pub ts_sec: u32,
    /// Microseconds or nanoseconds, depending on the file magic
    pub ts_frac: u32,
    pub data: &'a [u8],
}

/// Parse a pcap capture into signals of the requested kind
///
/// **Public** - entry point for `.pcap` inputs
///
/// # Errors
/// * `ParseError::UnsupportedFormat` - PCAPNG file, or group ids requested from a non-radiotap capture
/// * `ParseError::InvalidFormat` - truncated or corrupt file
pub fn parse_pcap(bytes: &[u8], kind: SignalKind) -> Result<SignalSequence, ParseError> {
    let header = read_header(bytes)?;
    let records = read_records(bytes, &header)?;

    debug!(
        "pcap: link type {}, {} records, {} timestamps",
        header.link_type,
        records.len(),
        if header.nanosecond_timestamps { "ns" } else { "us" }
    );

    match kind {
        SignalKind::Timed => Ok(SignalSequence::Timed(arrival_times(&records, &header)?)),
        SignalKind::Grouped => {
            if header.link_type != LINKTYPE_IEEE802_11_RADIOTAP {
                return Err(ParseError::UnsupportedFormat(format!(
                    "link type {} carries no A-MPDU information (radiotap is {}); use timestamps instead",
                    header.link_type, LINKTYPE_IEEE802_11_RADIOTAP
                )));
            }

            let signals = records
                .iter()
                .enumerate()
                .map(|(index, record)| {
                    ampdu_reference(record.data)
                        .map(|reference| GroupedSignal::new(reference.map(i64::from)))
                        .map_err(|e| {
                            ParseError::InvalidFormat(format!("packet {}: {}", index, e))
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let ungrouped = signals.iter().filter(|s| s.group_id.is_none()).count();
            if ungrouped == signals.len() && !signals.is_empty() {
                warn!("No packet carries an A-MPDU status field; every packet is ungrouped");
            }

            Ok(SignalSequence::Grouped(signals))
        }
    }
}

/// Read and validate the 24-byte global header
pub fn read_header(bytes: &[u8]) -> Result<PcapHeader, ParseError> {
    if bytes.len() < 4 {
        return Err(ParseError::InvalidFormat("File too short for a pcap header".to_string()));
    }

    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let (little_endian, nanosecond_timestamps) = match magic {
        PCAP_MAGIC_MICROS => (true, false),
        PCAP_MAGIC_NANOS => (true, true),
        m if m == PCAP_MAGIC_MICROS.swap_bytes() => (false, false),
        m if m == PCAP_MAGIC_NANOS.swap_bytes() => (false, true),
        PCAPNG_MAGIC => {
            return Err(ParseError::UnsupportedFormat(
                "PCAPNG captures are not supported; convert to classic pcap".to_string(),
            ))
        }
        other => {
            return Err(ParseError::InvalidFormat(format!(
                "Unknown pcap magic number 0x{:08x}",
                other
            )))
        }
    };

    if bytes.len() < GLOBAL_HEADER_LEN {
        return Err(ParseError::InvalidFormat("Truncated pcap global header".to_string()));
    }

    let link_type = read_u32(&bytes[20..24], little_endian);

    Ok(PcapHeader {
        little_endian,
        nanosecond_timestamps,
        link_type,
    })
}

/// Split the packet records following the global header
pub fn read_records<'a>(
    bytes: &'a [u8],
    header: &PcapHeader,
) -> Result<Vec<PcapRecord<'a>>, ParseError> {
    let mut records = Vec::new();
    let mut offset = GLOBAL_HEADER_LEN;

    while offset < bytes.len() {
        let record_header = bytes
            .get(offset..offset + RECORD_HEADER_LEN)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Truncated record header at byte {}",
                    offset
                ))
            })?;

        let ts_sec = read_u32(&record_header[0..4], header.little_endian);
        let ts_frac = read_u32(&record_header[4..8], header.little_endian);
        let captured_len = read_u32(&record_header[8..12], header.little_endian) as usize;

        let data_start = offset + RECORD_HEADER_LEN;
        let data = bytes
            .get(data_start..data_start + captured_len)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Record {} claims {} bytes past end of file",
                    records.len(),
                    captured_len
                ))
            })?;

        records.push(PcapRecord {
            ts_sec,
            ts_frac,
            data,
        });
        offset = data_start + captured_len;
    }

    Ok(records)
}

/// Arrival time of every record in microseconds, relative to the first record
fn arrival_times(records: &[PcapRecord<'_>], header: &PcapHeader) -> Result<Vec<TimedSignal>, ParseError> {
    let frac_per_micro = if header.nanosecond_timestamps { 1_000.0 } else { 1.0 };
    let absolute_us =
        |r: &PcapRecord<'_>| r.ts_sec as f64 * 1_000_000.0 + r.ts_frac as f64 / frac_per_micro;

    let Some(origin) = records.first().map(absolute_us) else {
        return Ok(Vec::new());
    };

    records
        .iter()
        .map(|record| {
            TimedSignal::from_micros(absolute_us(record) - origin).map_err(ParseError::from)
        })
        .collect()
}

/// Extract the A-MPDU reference number from a radiotap header
///
/// Returns `Ok(None)` when the packet carries no A-MPDU status field.
///
/// # Errors
/// * `ParseError::InvalidFormat` - bad radiotap version or a field running past the header
pub fn ampdu_reference(packet: &[u8]) -> Result<Option<u32>, ParseError> {
    if packet.len() < 8 {
        return Err(ParseError::InvalidFormat("Radiotap header too short".to_string()));
    }
    if packet[0] != 0 {
        return Err(ParseError::InvalidFormat(format!(
            "Unsupported radiotap version {}",
            packet[0]
        )));
    }

    let header_len = u16::from_le_bytes([packet[2], packet[3]]) as usize;
    let header = packet.get(..header_len).ok_or_else(|| {
        ParseError::InvalidFormat(format!(
            "Radiotap length {} exceeds packet length {}",
            header_len,
            packet.len()
        ))
    })?;

    // Presence bitmaps chain while bit 31 is set
    let mut offset = 4;
    let first_present = read_present_word(header, offset)?;
    let mut present = first_present;
    while present & RADIOTAP_EXT_BIT != 0 {
        offset += 4;
        present = read_present_word(header, offset)?;
    }
    offset += 4;

    if first_present & (1 << RADIOTAP_AMPDU_STATUS_BIT) == 0 {
        return Ok(None);
    }

    for (bit, &(align, size)) in RADIOTAP_FIELDS.iter().enumerate() {
        if first_present & (1 << bit) != 0 {
            offset = align_to(offset, align) + size;
        }
    }
    offset = align_to(offset, AMPDU_STATUS_ALIGN);

    let reference = header.get(offset..offset + 4).ok_or_else(|| {
        ParseError::InvalidFormat("A-MPDU status field runs past radiotap header".to_string())
    })?;

    Ok(Some(read_u32(reference, true)))
}

fn read_present_word(header: &[u8], offset: usize) -> Result<u32, ParseError> {
    header
        .get(offset..offset + 4)
        .map(|word| read_u32(word, true))
        .ok_or_else(|| {
            ParseError::InvalidFormat("Radiotap presence bitmap runs past header".to_string())
        })
}

fn align_to(offset: usize, align: usize) -> usize {
    (offset + align - 1) / align * align
}

fn read_u32(bytes: &[u8], little_endian: bool) -> u32 {
    let word = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if little_endian {
        u32::from_le_bytes(word)
    } else {
        u32::from_be_bytes(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Radiotap header with flags (bit 1) and A-MPDU status (bit 20)
    fn radiotap_with_ampdu(reference: u32) -> Vec<u8> {
        let present: u32 = (1 << 1) | (1 << RADIOTAP_AMPDU_STATUS_BIT);
        let mut header = vec![0u8, 0, 0, 0];
        header.extend_from_slice(&present.to_le_bytes());
        header.push(0x10); // flags at offset 8
        header.extend_from_slice(&[0, 0, 0]); // pad to 12
        header.extend_from_slice(&reference.to_le_bytes());
        header.extend_from_slice(&[0, 0, 0, 0]); // A-MPDU flags, delimiter CRC, reserved
        let len = header.len() as u16;
        header[2..4].copy_from_slice(&len.to_le_bytes());
        header
    }

    fn radiotap_without_ampdu() -> Vec<u8> {
        let present: u32 = 1 << 1;
        let mut header = vec![0u8, 0, 9, 0];
        header.extend_from_slice(&present.to_le_bytes());
        header.push(0);
        header
    }

    #[test]
    fn test_ampdu_reference_present() {
        let packet = radiotap_with_ampdu(0xdead_beef);
        assert_eq!(ampdu_reference(&packet).unwrap(), Some(0xdead_beef));
    }

    #[test]
    fn test_ampdu_reference_absent() {
        assert_eq!(ampdu_reference(&radiotap_without_ampdu()).unwrap(), None);
    }

    #[test]
    fn test_ampdu_reference_after_extended_bitmap() {
        // TSFT + A-MPDU in the first word, one extra presence word
        let present: u32 = 1 | (1 << RADIOTAP_AMPDU_STATUS_BIT) | RADIOTAP_EXT_BIT;
        let mut packet = vec![0u8, 0, 0, 0];
        packet.extend_from_slice(&present.to_le_bytes());
        packet.extend_from_slice(&0u32.to_le_bytes()); // second presence word, ends at 12
        packet.extend_from_slice(&[0; 4]); // pad TSFT to 16
        packet.extend_from_slice(&[0; 8]); // TSFT
        packet.extend_from_slice(&42u32.to_le_bytes());
        packet.extend_from_slice(&[0; 4]);
        let len = packet.len() as u16;
        packet[2..4].copy_from_slice(&len.to_le_bytes());

        assert_eq!(ampdu_reference(&packet).unwrap(), Some(42));
    }

    #[test]
    fn test_ampdu_reference_after_fhss() {
        // flags (8), pad, FHSS (10..12), antenna signal (12), pad to 16
        let present: u32 =
            (1 << 1) | (1 << 4) | (1 << 5) | (1 << RADIOTAP_AMPDU_STATUS_BIT);
        let mut packet = vec![0u8, 0, 0, 0];
        packet.extend_from_slice(&present.to_le_bytes());
        packet.extend_from_slice(&[0x10, 0]);
        packet.extend_from_slice(&[0x05, 0x01]);
        packet.extend_from_slice(&[0xc4, 0, 0, 0]);
        packet.extend_from_slice(&77u32.to_le_bytes());
        packet.extend_from_slice(&[0; 4]);
        let len = packet.len() as u16;
        packet[2..4].copy_from_slice(&len.to_le_bytes());

        assert_eq!(ampdu_reference(&packet).unwrap(), Some(77));
    }

    #[test]
    fn test_ampdu_reference_truncated() {
        let mut packet = radiotap_with_ampdu(7);
        packet.truncate(14);
        packet[2..4].copy_from_slice(&14u16.to_le_bytes());
        assert!(ampdu_reference(&packet).is_err());
    }

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(9, 4), 12);
        assert_eq!(align_to(8, 8), 8);
        assert_eq!(align_to(5, 1), 5);
    }

    #[test]
    fn test_pcapng_rejected() {
        let bytes = [0x0a, 0x0d, 0x0d, 0x0a, 0, 0, 0, 0];
        assert!(matches!(
            read_header(&bytes),
            Err(ParseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_big_endian_header() {
        let mut bytes = PCAP_MAGIC_MICROS.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0; 16]);
        bytes.extend_from_slice(&LINKTYPE_IEEE802_11_RADIOTAP.to_be_bytes());

        let header = read_header(&bytes).unwrap();
        assert!(!header.little_endian);
        assert!(!header.nanosecond_timestamps);
        assert_eq!(header.link_type, LINKTYPE_IEEE802_11_RADIOTAP);
    }
}
