#![no_main]

use libfuzzer_sys::fuzz_target;
use tagwright::id3::v2::VolumeAdjustment;

fuzz_target!(|data: &[u8]| {
	if let Ok(adjustment) = VolumeAdjustment::parse(data) {
		let _ = adjustment.as_bytes();
	}
});
