use crate::extraction::PositionedFragment;
use rust_decimal::Decimal;

/// Order one page's fragments into reading order.
///
/// Fragments are sorted top to bottom. Consecutive fragments whose top
/// lies less than `tolerance` below the first fragment of the current line
/// join that line, and each line is then ordered left to right. Anchoring
/// on the line's first fragment keeps the grouping a total order, so a run
/// of slightly drifting tops cannot chain into one endless line.
pub fn order_page(
    mut fragments: Vec<PositionedFragment>,
    tolerance: Decimal,
) -> Vec<PositionedFragment> {
    fragments.sort_by(|a, b| a.top.cmp(&b.top).then(a.left.cmp(&b.left)));

    let mut ordered = Vec::with_capacity(fragments.len());
    let mut line: Vec<PositionedFragment> = Vec::new();
    let mut line_top: Option<Decimal> = None;

    for fragment in fragments {
        let same_line = line_top.is_some_and(|top| fragment.top - top < tolerance);
        if !same_line {
            flush_line(&mut line, &mut ordered);
            line_top = Some(fragment.top);
        }
        line.push(fragment);
    }
    flush_line(&mut line, &mut ordered);

    ordered
}

fn flush_line(line: &mut Vec<PositionedFragment>, out: &mut Vec<PositionedFragment>) {
    line.sort_by(|a, b| a.left.cmp(&b.left));
    out.append(line);
}
