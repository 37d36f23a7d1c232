//! LNURL bech32 encoding (LUD-01) and LNURL-pay metadata (LUD-06).

pub mod metadata;

use anyhow::{Result, anyhow};
use bech32::Hrp;
use bech32::primitives::checksum::Checksum;
use bech32::primitives::decode::CheckedHrpstring;

pub use metadata::PayMetadata;

const LNURL_HRP: Hrp = Hrp::parse_unchecked("lnurl");

/// Plain bech32 with the code length raised to 2000 characters.
///
/// LNURLs are URLs, which regularly exceed the 90 character limit of segwit
/// addresses and can exceed the 1023 character limit of [`bech32::Bech32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LnurlBech32 {}

impl Checksum for LnurlBech32 {
    type MidstateRepr = u32;
    const CODE_LENGTH: usize = 2000;
    const CHECKSUM_LENGTH: usize = 6;
    const GENERATOR_SH: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
    const TARGET_RESIDUE: u32 = 1;
}

/// Encode a URL as an uppercase LNURL bech32 string.
pub fn encode_lnurl(url: &str) -> Result<String> {
    bech32::encode_upper::<LnurlBech32>(LNURL_HRP, url.as_bytes())
        .map_err(|e| anyhow!("Failed to encode LNURL: {}", e))
}

/// Decode a bech32 LNURL (either case) back into its URL.
pub fn decode_lnurl(lnurl: &str) -> Result<String> {
    let lower = lnurl.trim().to_lowercase();
    let checked = CheckedHrpstring::new::<LnurlBech32>(&lower)
        .map_err(|e| anyhow!("Invalid LNURL: {}", e))?;

    if checked.hrp() != LNURL_HRP {
        return Err(anyhow!("Invalid LNURL prefix: {}", checked.hrp()));
    }

    String::from_utf8(checked.byte_iter().collect())
        .map_err(|_| anyhow!("LNURL does not contain a UTF-8 URL"))
}
