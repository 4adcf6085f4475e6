//! Splicing slices into trees.
//!
//! Replacing `[from, to)` with an open slice closes the ancestors of both
//! ends and joins open slice edges onto the content they land next to. Every
//! node that gets rebuilt is validated against its content rule.

use crate::error::ReplaceError;
use crate::node::{Fragment, Node};
use crate::resolved::ResolvedPos;
use crate::slice::Slice;

pub(crate) fn replace(from: &ResolvedPos, to: &ResolvedPos, slice: &Slice) -> Result<Node, ReplaceError> {
	if slice.open_start() > from.depth() {
		return Err(ReplaceError::TooDeep);
	}
	if to.depth().checked_sub(slice.open_end()) != Some(from.depth() - slice.open_start()) {
		return Err(ReplaceError::InconsistentOpenDepths);
	}
	replace_outer(from, to, slice, 0)
}

fn replace_outer(from: &ResolvedPos, to: &ResolvedPos, slice: &Slice, depth: usize) -> Result<Node, ReplaceError> {
	let index = from.index(depth);
	let node = from.node(depth);
	if index == to.index(depth) && depth < from.depth() - slice.open_start() {
		let inner = replace_outer(from, to, slice, depth + 1)?;
		return Ok(node.copy(node.content().replace_child(index, inner)));
	}
	if slice.content().size() == 0 {
		return close(node, replace_two_way(from, to, depth)?);
	}
	if slice.open_start() == 0 && slice.open_end() == 0 && from.depth() == depth && to.depth() == depth {
		let parent = from.parent();
		let content = parent.content();
		let joined = content
			.cut(0, from.parent_offset())
			.append(slice.content())
			.append(&content.cut(to.parent_offset(), content.size()));
		return close(parent, joined);
	}
	let (start, end) = prepare_slice(slice, from)?;
	close(node, replace_three_way(from, &start, &end, to, depth)?)
}

fn check_join(main: &Node, sub: &Node) -> Result<(), ReplaceError> {
	if main.spec().content == sub.spec().content {
		Ok(())
	} else {
		Err(ReplaceError::CannotJoin {
			main: main.spec().name,
			sub: sub.spec().name,
		})
	}
}

fn joinable(before: &ResolvedPos, after: &ResolvedPos, depth: usize) -> Result<Node, ReplaceError> {
	let node = before.node(depth);
	check_join(node, after.node(depth))?;
	Ok(node.clone())
}

fn add_node(child: Node, target: &mut Vec<Node>) {
	crate::node::push_joined(target, child);
}

fn add_range(start: Option<&ResolvedPos>, end: Option<&ResolvedPos>, depth: usize, target: &mut Vec<Node>) {
	let Some(anchor) = end.or(start) else {
		return;
	};
	let node = anchor.node(depth);
	let mut start_index = 0;
	let end_index = end.map_or(node.child_count(), |end| end.index(depth));
	if let Some(start) = start {
		start_index = start.index(depth);
		if start.depth() > depth {
			start_index += 1;
		} else if start.text_offset() > 0 {
			if let Some(after) = start.node_after() {
				add_node(after, target);
			}
			start_index += 1;
		}
	}
	for index in start_index..end_index {
		add_node(node.child(index).clone(), target);
	}
	if let Some(end) = end
		&& end.depth() == depth
		&& end.text_offset() > 0
		&& let Some(before) = end.node_before()
	{
		add_node(before, target);
	}
}

fn close(node: &Node, content: Fragment) -> Result<Node, ReplaceError> {
	node.check_content(&content)?;
	Ok(node.copy(content))
}

fn replace_three_way(
	from: &ResolvedPos,
	start: &ResolvedPos,
	end: &ResolvedPos,
	to: &ResolvedPos,
	depth: usize,
) -> Result<Fragment, ReplaceError> {
	let open_start = if from.depth() > depth {
		Some(joinable(from, start, depth + 1)?)
	} else {
		None
	};
	let open_end = if to.depth() > depth {
		Some(joinable(end, to, depth + 1)?)
	} else {
		None
	};

	let mut content = Vec::new();
	add_range(None, Some(from), depth, &mut content);
	match (&open_start, &open_end) {
		(Some(open_start), Some(open_end)) if start.index(depth) == end.index(depth) => {
			check_join(open_start, open_end)?;
			let inner = replace_three_way(from, start, end, to, depth + 1)?;
			add_node(close(open_start, inner)?, &mut content);
		}
		_ => {
			if let Some(open_start) = &open_start {
				add_node(close(open_start, replace_two_way(from, start, depth + 1)?)?, &mut content);
			}
			add_range(Some(start), Some(end), depth, &mut content);
			if let Some(open_end) = &open_end {
				add_node(close(open_end, replace_two_way(end, to, depth + 1)?)?, &mut content);
			}
		}
	}
	add_range(Some(to), None, depth, &mut content);
	Ok(Fragment::from_nodes(content))
}

fn replace_two_way(from: &ResolvedPos, to: &ResolvedPos, depth: usize) -> Result<Fragment, ReplaceError> {
	let mut content = Vec::new();
	add_range(None, Some(from), depth, &mut content);
	if from.depth() > depth {
		let node = joinable(from, to, depth + 1)?;
		add_node(close(&node, replace_two_way(from, to, depth + 1)?)?, &mut content);
	}
	add_range(Some(to), None, depth, &mut content);
	Ok(Fragment::from_nodes(content))
}

/// Wraps the slice in copies of `along`'s ancestors so its open edges can be
/// resolved like positions in a real document.
fn prepare_slice(slice: &Slice, along: &ResolvedPos) -> Result<(ResolvedPos, ResolvedPos), ReplaceError> {
	let extra = along.depth() - slice.open_start();
	let mut node = along.node(extra).copy(slice.content().clone());
	for depth in (0..extra).rev() {
		node = along.node(depth).copy(Fragment::from(node));
	}
	let start = node.resolve(slice.open_start() + extra)?;
	let end = node.resolve(node.content_size().saturating_sub(slice.open_end() + extra))?;
	Ok((start, end))
}
