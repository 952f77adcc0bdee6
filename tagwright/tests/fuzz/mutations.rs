use crate::timeout_test;

// A small xorshift generator, so every run sees the same inputs
struct Rng(u64);

impl Rng {
	fn next_u64(&mut self) -> u64 {
		self.0 ^= self.0 << 13;
		self.0 ^= self.0 >> 7;
		self.0 ^= self.0 << 17;
		self.0
	}

	fn below(&mut self, n: usize) -> usize {
		(self.next_u64() % n as u64) as usize
	}
}

fn seed_tag() -> Vec<u8> {
	let frames: [(&[u8], &[u8]); 5] = [
		(b"TIT2", b"\x00Title"),
		(b"COMM", b"\x01eng\xFF\xFEd\x00\x00\x00\xFF\xFEc\x00"),
		(b"APIC", b"\x00image/png\x00\x03\x00\x89PNG"),
		(b"RVA2", b"track\x00\x01\xFC\x00\x00"),
		(b"TCON", b"\x00(17)Rock"),
	];

	let mut body = Vec::new();
	for (id, content) in frames {
		body.extend(id);
		body.extend((content.len() as u32).to_be_bytes());
		body.extend([0, 0]);
		body.extend(content);
	}
	body.extend([0; 16]);

	let mut tag = b"ID3\x04\x00\x00".to_vec();
	let size = body.len() as u32;
	tag.extend([0, 0, (size >> 7) as u8 & 0x7F, size as u8 & 0x7F]);
	tag.extend(body);
	tag
}

#[test_log::test]
fn mutated_tags() {
	let seed = seed_tag();
	let mut rng = Rng(0x2545_F491_4F6C_DD1D);

	for _ in 0..200 {
		let mut data = seed.clone();
		for _ in 0..=rng.below(8) {
			let index = rng.below(data.len());
			data[index] = rng.next_u64() as u8;
		}

		timeout_test(data);
	}
}

#[test_log::test]
fn truncated_tags() {
	let seed = seed_tag();

	for len in 0..seed.len() {
		timeout_test(seed[..len].to_vec());
	}
}

#[test_log::test]
fn every_version_byte() {
	let seed = seed_tag();

	for major in 0..=u8::MAX {
		let mut data = seed.clone();
		data[3] = major;
		timeout_test(data);
	}
}

#[test_log::test]
fn huge_declared_sizes() {
	let mut data = seed_tag();
	data[6..10].copy_from_slice(&[0x7F; 4]);
	timeout_test(data.clone());

	// A frame claiming nearly 4 GiB
	data[14..18].copy_from_slice(&[0xFF; 4]);
	timeout_test(data);
}
