//! Data element tags, which identify a single data element in a data set.

/// A data element tag, made up of a 16-bit group number and a 16-bit element
/// number. Tags are ordered by group, then by element, which is the order data
/// elements are stored in a data set.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataElementTag {
  pub group: u16,
  pub element: u16,
}

impl DataElementTag {
  /// The zero tag, i.e. (0000,0000).
  ///
  pub const ZERO: Self = Self::new(0, 0);

  /// Constructs a new data element tag from a group and element.
  ///
  pub const fn new(group: u16, element: u16) -> Self {
    Self { group, element }
  }

  /// Returns whether a tag is for a private data element, which is the case
  /// when its group number is odd.
  ///
  pub fn is_private(&self) -> bool {
    self.group % 2 == 1
  }

  /// Returns whether a tag is for a private creator data element, which sits
  /// in an odd group with an element number in the range 0x0010-0x00FF.
  ///
  pub fn is_private_creator(&self) -> bool {
    self.is_private() && (0x0010..=0x00FF).contains(&self.element)
  }

  /// Returns a tag as a single 32-bit integer with the group in the high bits.
  ///
  pub fn to_int(&self) -> u32 {
    (u32::from(self.group) << 16) | u32::from(self.element)
  }

  /// Formats a tag as an eight character uppercase hex string, e.g.
  /// `"00100010"`. This is the form used for keys in DICOM JSON.
  ///
  pub fn to_hex_string(&self) -> String {
    format!("{:04X}{:04X}", self.group, self.element)
  }

  /// Parses a tag from a hex string. Both the plain eight character form,
  /// e.g. `"00100010"`, and the parenthesized form, e.g. `"(0010,0010)"`, are
  /// accepted.
  ///
  #[allow(clippy::result_unit_err)]
  pub fn from_hex_string(s: &str) -> Result<Self, ()> {
    let s = s.trim();

    let parenthesized = s.strip_prefix('(').and_then(|s| s.strip_suffix(')'));

    let hex = match parenthesized {
      Some(inner) => match inner.split_once(',') {
        Some((group, element)) if group.len() == 4 && element.len() == 4 => {
          format!("{group}{element}")
        }
        _ => return Err(()),
      },
      None => s.to_string(),
    };

    if hex.len() != 8 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(());
    }

    let value = u32::from_str_radix(&hex, 16).map_err(|_| ())?;

    Ok(Self::new((value >> 16) as u16, (value & 0xFFFF) as u16))
  }
}

impl core::fmt::Display for DataElementTag {
  /// Formats a tag as `"(GGGG,EEEE)"`.
  ///
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    write!(f, "({:04X},{:04X})", self.group, self.element)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn is_private_test() {
    assert!(DataElementTag::new(0x0009, 0x0002).is_private());
    assert!(!DataElementTag::new(0x0010, 0x0010).is_private());

    assert!(DataElementTag::new(0x0029, 0x0010).is_private_creator());
    assert!(!DataElementTag::new(0x0029, 0x1010).is_private_creator());
  }

  #[test]
  fn ordering_test() {
    let mut tags = vec![
      DataElementTag::new(0x0010, 0x0020),
      DataElementTag::new(0x0008, 0x0050),
      DataElementTag::new(0x0010, 0x0010),
    ];
    tags.sort();

    assert_eq!(
      tags,
      vec![
        DataElementTag::new(0x0008, 0x0050),
        DataElementTag::new(0x0010, 0x0010),
        DataElementTag::new(0x0010, 0x0020),
      ]
    );
  }

  #[test]
  fn to_string_test() {
    let tag = DataElementTag::new(0x7FE0, 0x0010);

    assert_eq!(tag.to_string(), "(7FE0,0010)");
    assert_eq!(tag.to_hex_string(), "7FE00010");
    assert_eq!(tag.to_int(), 0x7FE00010);
  }

  #[test]
  fn from_hex_string_test() {
    assert_eq!(
      DataElementTag::from_hex_string("00100020"),
      Ok(DataElementTag::new(0x0010, 0x0020))
    );

    assert_eq!(
      DataElementTag::from_hex_string("(0008,1030)"),
      Ok(DataElementTag::new(0x0008, 0x1030))
    );

    assert_eq!(
      DataElementTag::from_hex_string("7fe00010"),
      Ok(DataElementTag::new(0x7FE0, 0x0010))
    );

    assert_eq!(DataElementTag::from_hex_string("0010002"), Err(()));
    assert_eq!(DataElementTag::from_hex_string("0010002G"), Err(()));
    assert_eq!(DataElementTag::from_hex_string("(0010,20)"), Err(()));
    assert_eq!(DataElementTag::from_hex_string("PatientID"), Err(()));
  }
}
