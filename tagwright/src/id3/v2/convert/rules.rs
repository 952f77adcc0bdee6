//! The frame conversion tables
//!
//! Each table covers a single version step. Going forward, a frame is matched by its ID in the
//! older version, going backward by its ID in the newer version. The first matching rule wins.

/// Frame specific conversions, beyond a change of ID
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Converter {
	/// `LNK`/`LINK`, the linked frame ID is converted as well
	Link,
	/// `PIC`/`APIC`, image format and MIME type
	Picture,
	/// `TYER`/`TDAT`/`TIME` and `TDRC`
	Timestamp,
	/// `TCON` genre references
	Genre,
	/// `XRV`/`XRVA`/`RVA2`, only validated
	VolumeAdjustment,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ConversionRule {
	/// The ID in the older version, `None` if the frame doesn't exist there
	pub older: Option<&'static str>,
	/// The ID in the newer version, `None` if the frame doesn't exist there
	pub newer: Option<&'static str>,
	pub converter: Option<Converter>,
}

const fn rule(
	older: Option<&'static str>,
	newer: Option<&'static str>,
	converter: Option<Converter>,
) -> ConversionRule {
	ConversionRule {
		older,
		newer,
		converter,
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
	/// Towards a newer version
	Forward,
	/// Towards an older version
	Backward,
}

impl ConversionRule {
	/// The ID matched against in `direction`
	pub(crate) fn source(&self, direction: Direction) -> Option<&'static str> {
		match direction {
			Direction::Forward => self.older,
			Direction::Backward => self.newer,
		}
	}

	/// The ID a matched frame takes on in `direction`
	pub(crate) fn target(&self, direction: Direction) -> Option<&'static str> {
		match direction {
			Direction::Forward => self.newer,
			Direction::Backward => self.older,
		}
	}
}

pub(crate) static V2_V3: &[ConversionRule] = &[
	rule(Some("BUF"), Some("RBUF"), None),
	rule(Some("CNT"), Some("PCNT"), None),
	rule(Some("COM"), Some("COMM"), None),
	rule(Some("CRA"), Some("AENC"), None),
	rule(Some("CRM"), None, None),
	rule(Some("ETC"), Some("ETCO"), None),
	rule(Some("EQU"), Some("EQUA"), None),
	rule(Some("GEO"), Some("GEOB"), None),
	rule(Some("IPL"), Some("IPLS"), None),
	rule(Some("LNK"), Some("LINK"), Some(Converter::Link)),
	rule(Some("MCI"), Some("MCDI"), None),
	rule(Some("MLL"), Some("MLLT"), None),
	rule(Some("PIC"), Some("APIC"), Some(Converter::Picture)),
	rule(Some("POP"), Some("POPM"), None),
	rule(Some("REV"), Some("RVRB"), None),
	rule(Some("RVA"), Some("RVAD"), None),
	rule(Some("SLT"), Some("SYLT"), None),
	rule(Some("STC"), Some("SYTC"), None),
	rule(Some("TAL"), Some("TALB"), None),
	rule(Some("TBP"), Some("TBPM"), None),
	rule(Some("TCM"), Some("TCOM"), None),
	rule(Some("TCO"), Some("TCON"), None),
	rule(Some("TCR"), Some("TCOP"), None),
	rule(Some("TDA"), Some("TDAT"), None),
	rule(Some("TDY"), Some("TDLY"), None),
	rule(Some("TEN"), Some("TENC"), None),
	rule(Some("TFT"), Some("TFLT"), None),
	rule(Some("TIM"), Some("TIME"), None),
	rule(Some("TKE"), Some("TKEY"), None),
	rule(Some("TLA"), Some("TLAN"), None),
	rule(Some("TLE"), Some("TLEN"), None),
	rule(Some("TMT"), Some("TMED"), None),
	rule(Some("TOA"), Some("TOPE"), None),
	rule(Some("TOF"), Some("TOFN"), None),
	rule(Some("TOL"), Some("TOLY"), None),
	rule(Some("TOR"), Some("TORY"), None),
	rule(Some("TOT"), Some("TOAL"), None),
	rule(Some("TP1"), Some("TPE1"), None),
	rule(Some("TP2"), Some("TPE2"), None),
	rule(Some("TP3"), Some("TPE3"), None),
	rule(Some("TP4"), Some("TPE4"), None),
	rule(Some("TPA"), Some("TPOS"), None),
	rule(Some("TPB"), Some("TPUB"), None),
	rule(Some("TRC"), Some("TSRC"), None),
	rule(Some("TRD"), Some("TRDA"), None),
	rule(Some("TRK"), Some("TRCK"), None),
	rule(Some("TSI"), Some("TSIZ"), None),
	rule(Some("TSS"), Some("TSSE"), None),
	rule(Some("TT1"), Some("TIT1"), None),
	rule(Some("TT2"), Some("TIT2"), None),
	rule(Some("TT3"), Some("TIT3"), None),
	rule(Some("TXT"), Some("TEXT"), None),
	rule(Some("TXX"), Some("TXXX"), None),
	rule(Some("TYE"), Some("TYER"), None),
	rule(Some("UFI"), Some("UFID"), None),
	rule(Some("ULT"), Some("USLT"), None),
	rule(Some("WAF"), Some("WOAF"), None),
	rule(Some("WAR"), Some("WOAR"), None),
	rule(Some("WAS"), Some("WOAS"), None),
	rule(Some("WCM"), Some("WCOM"), None),
	rule(Some("WCP"), Some("WCOP"), None),
	rule(Some("WPB"), Some("WPUB"), None),
	rule(Some("WXX"), Some("WXXX"), None),
	rule(Some("XRV"), Some("XRVA"), Some(Converter::VolumeAdjustment)),
];

pub(crate) static V3_V4: &[ConversionRule] = &[
	// Dropped or merged in ID3v2.4
	rule(Some("EQUA"), None, None),
	rule(Some("IPLS"), Some("TIPL"), None),
	rule(Some("RVAD"), None, None),
	rule(Some("TDAT"), Some("TDRC"), Some(Converter::Timestamp)),
	rule(Some("TIME"), Some("TDRC"), Some(Converter::Timestamp)),
	rule(Some("TORY"), Some("TDOR"), None),
	// Free form, there is no way to fit it into a timestamp
	rule(Some("TRDA"), None, None),
	rule(Some("TSIZ"), None, None),
	rule(Some("TYER"), Some("TDRC"), Some(Converter::Timestamp)),
	rule(Some("XRVA"), Some("RVA2"), Some(Converter::VolumeAdjustment)),
	// Only exist in ID3v2.4
	rule(None, Some("ASPI"), None),
	rule(None, Some("EQU2"), None),
	rule(None, Some("RVA2"), None),
	rule(None, Some("SEEK"), None),
	rule(None, Some("SIGN"), None),
	rule(None, Some("TDEN"), None),
	rule(None, Some("TDOR"), None),
	rule(None, Some("TDRC"), None),
	rule(None, Some("TDRL"), None),
	rule(None, Some("TDTG"), None),
	rule(None, Some("TIPL"), None),
	rule(None, Some("TMCL"), None),
	rule(None, Some("TMOO"), None),
	rule(None, Some("TPRO"), None),
	rule(None, Some("TSOA"), None),
	rule(None, Some("TSOP"), None),
	rule(None, Some("TSOT"), None),
	rule(None, Some("TSST"), None),
	// Same ID, different layout
	rule(Some("LINK"), Some("LINK"), Some(Converter::Link)),
	rule(Some("TCON"), Some("TCON"), Some(Converter::Genre)),
];

pub(crate) fn find_rule(
	rules: &'static [ConversionRule],
	direction: Direction,
	id: &str,
) -> Option<&'static ConversionRule> {
	rules.iter().find(|rule| rule.source(direction) == Some(id))
}
