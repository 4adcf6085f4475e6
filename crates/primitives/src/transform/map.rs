use bitflags::bitflags;
use smallvec::{SmallVec, smallvec};

use crate::Pos;

/// Bias determines how positions at change boundaries are mapped.
///
/// When mapping a position through a change, bias determines whether the position
/// moves with insertions or stays before them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Position stays before insertions at the same location.
	Left,
	/// Position moves after insertions at the same location.
	Right,
}

impl Bias {
	/// Bias pointing along a movement direction (`side < 0` is left).
	pub fn from_side(side: i8) -> Self {
		if side < 0 { Bias::Left } else { Bias::Right }
	}

	/// The opposite bias.
	pub fn flip(self) -> Self {
		match self {
			Bias::Left => Bias::Right,
			Bias::Right => Bias::Left,
		}
	}
}

bitflags! {
	/// Which parts of the content around a mapped position were deleted.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub struct DelFlags: u8 {
		/// Content before the position was deleted.
		const BEFORE = 1 << 0;
		/// Content after the position was deleted.
		const AFTER = 1 << 1;
		/// A range spanning the position was deleted.
		const ACROSS = 1 << 2;
		/// The content on the side the bias points to was deleted.
		const SIDE = 1 << 3;
	}
}

/// A mapped position plus information about deletions around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapResult {
	/// The mapped position.
	pub pos: Pos,
	flags: DelFlags,
}

impl MapResult {
	/// The content on the biased side of the position was deleted.
	pub fn deleted(&self) -> bool {
		self.flags.contains(DelFlags::SIDE)
	}

	/// Content directly before the position was deleted.
	pub fn deleted_before(&self) -> bool {
		self.flags.intersects(DelFlags::BEFORE | DelFlags::SIDE)
	}

	/// Content directly after the position was deleted.
	pub fn deleted_after(&self) -> bool {
		self.flags.intersects(DelFlags::AFTER | DelFlags::SIDE)
	}

	/// The position was inside a deleted range.
	pub fn deleted_across(&self) -> bool {
		self.flags.contains(DelFlags::ACROSS)
	}
}

/// Anything positions can be mapped through.
pub trait Mappable {
	/// Maps a position, reporting deletions around it.
	fn map_result(&self, pos: Pos, bias: Bias) -> MapResult;

	/// Maps a position.
	fn map(&self, pos: Pos, bias: Bias) -> Pos {
		self.map_result(pos, bias).pos
	}
}

/// One replaced range: `old_size` units at `start` became `new_size` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRange {
	/// Start of the replaced range.
	pub start: Pos,
	/// Size before the change.
	pub old_size: usize,
	/// Size after the change.
	pub new_size: usize,
}

/// The position changes made by a single step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepMap {
	ranges: SmallVec<[MapRange; 1]>,
}

impl StepMap {
	/// A map that changes nothing.
	pub fn empty() -> Self {
		Self::default()
	}

	/// A map over the given replaced ranges, which must be sorted and disjoint.
	pub fn new(ranges: impl IntoIterator<Item = MapRange>) -> Self {
		Self {
			ranges: ranges.into_iter().collect(),
		}
	}

	/// A map shifting every position forward by `n`.
	///
	/// Used to replay edits made in a nested document at the position the
	/// nested document's content starts in its container.
	pub fn offset(n: usize) -> Self {
		if n == 0 {
			return Self::empty();
		}
		Self {
			ranges: smallvec![MapRange {
				start: 0,
				old_size: 0,
				new_size: n,
			}],
		}
	}

	/// The replaced ranges.
	pub fn ranges(&self) -> &[MapRange] {
		&self.ranges
	}
}

impl Mappable for StepMap {
	fn map_result(&self, pos: Pos, bias: Bias) -> MapResult {
		let mut diff: isize = 0;
		for range in &self.ranges {
			let start = range.start;
			if start > pos {
				break;
			}
			let end = start + range.old_size;
			if pos <= end {
				let side = if range.old_size == 0 {
					bias
				} else if pos == start {
					Bias::Left
				} else if pos == end {
					Bias::Right
				} else {
					bias
				};
				let mapped = start.saturating_add_signed(diff) + if side == Bias::Left { 0 } else { range.new_size };
				let mut flags = if pos == start {
					DelFlags::AFTER
				} else if pos == end {
					DelFlags::BEFORE
				} else {
					DelFlags::ACROSS
				};
				let off_side = match bias {
					Bias::Left => pos != start,
					Bias::Right => pos != end,
				};
				if off_side {
					flags |= DelFlags::SIDE;
				}
				return MapResult { pos: mapped, flags };
			}
			diff += range.new_size as isize - range.old_size as isize;
		}
		MapResult {
			pos: pos.saturating_add_signed(diff),
			flags: DelFlags::empty(),
		}
	}
}

/// An ordered pipeline of step maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
	maps: Vec<StepMap>,
}

impl Mapping {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a step map to the end of the pipeline.
	pub fn append_map(&mut self, map: StepMap) {
		self.maps.push(map);
	}

	/// The step maps in order.
	pub fn maps(&self) -> &[StepMap] {
		&self.maps
	}

	/// Number of step maps.
	pub fn len(&self) -> usize {
		self.maps.len()
	}

	/// Returns true if the mapping has no step maps.
	pub fn is_empty(&self) -> bool {
		self.maps.is_empty()
	}

	/// A mapping over the maps from index `from` onwards.
	pub fn slice(&self, from: usize) -> Mapping {
		Mapping {
			maps: self.maps.get(from..).map(<[StepMap]>::to_vec).unwrap_or_default(),
		}
	}
}

impl Mappable for Mapping {
	fn map_result(&self, pos: Pos, bias: Bias) -> MapResult {
		let mut flags = DelFlags::empty();
		let mut pos = pos;
		for map in &self.maps {
			let result = map.map_result(pos, bias);
			flags |= result.flags;
			pos = result.pos;
		}
		MapResult { pos, flags }
	}
}
