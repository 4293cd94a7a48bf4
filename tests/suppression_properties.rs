use detpost::lowlevel::suppress_indices;
use detpost::{iou, suppress, BoundingBox, CenterBox, SuppressionMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_box(rng: &mut StdRng, class_index: usize) -> Option<BoundingBox> {
    let w = rng.random_range(0.02f32..0.4);
    let h = rng.random_range(0.02f32..0.4);
    let cx = rng.random_range(w / 2.0..1.0 - w / 2.0);
    let cy = rng.random_range(h / 2.0..1.0 - h / 2.0);
    let confidence = rng.random_range(0.3f32..1.0);
    BoundingBox::new(
        CenterBox::new(cx, cy, w, h),
        confidence,
        class_index,
        format!("class{class_index}"),
    )
}

fn random_boxes(seed: u64, count: usize) -> Vec<BoundingBox> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .filter_map(|i| random_box(&mut rng, i % 3))
        .collect()
}

fn jittered(base: CenterBox, dx: f32, dy: f32, confidence: f32) -> BoundingBox {
    BoundingBox::new(
        CenterBox::new(base.cx + dx, base.cy + dy, base.w, base.h),
        confidence,
        0,
        "obj",
    )
    .unwrap()
}

#[test]
fn iou_is_symmetric() {
    let boxes = random_boxes(7, 64);
    for a in &boxes {
        for b in &boxes {
            assert_eq!(iou(a, b), iou(b, a));
        }
    }
}

#[test]
fn iou_with_self_is_one() {
    for bbox in random_boxes(11, 64) {
        assert!((iou(&bbox, &bbox) - 1.0).abs() < 1e-5, "{bbox:?}");
    }
}

#[test]
fn iou_of_disjoint_boxes_is_zero() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..64 {
        let left = BoundingBox::new(
            CenterBox::new(rng.random_range(0.15f32..0.3), 0.5, 0.2, 0.2),
            0.9,
            0,
            "l",
        )
        .unwrap();
        let right = BoundingBox::new(
            CenterBox::new(rng.random_range(0.7f32..0.85), 0.5, 0.2, 0.2),
            0.9,
            0,
            "r",
        )
        .unwrap();
        assert_eq!(iou(&left, &right), 0.0);
    }
}

#[test]
fn iou_stays_in_unit_range() {
    let boxes = random_boxes(13, 48);
    for a in &boxes {
        for b in &boxes {
            let value = iou(a, b);
            assert!((0.0..=1.0 + 1e-3).contains(&value), "{value}");
        }
    }
}

#[test]
fn suppression_is_idempotent() {
    for seed in 0..8 {
        let once = suppress(random_boxes(seed, 80), 0.45);
        let twice = suppress(once.clone(), 0.45);
        assert_eq!(once, twice);
    }
}

#[test]
fn suppression_never_grows_the_list() {
    for seed in 20..28 {
        let boxes = random_boxes(seed, 60);
        let len = boxes.len();
        assert!(suppress(boxes, 0.3).len() <= len);
    }
}

#[test]
fn nothing_is_dropped_below_the_threshold() {
    let boxes = random_boxes(41, 40);
    let mut max_iou = 0.0f32;
    for (i, a) in boxes.iter().enumerate() {
        for b in &boxes[i + 1..] {
            max_iou = max_iou.max(iou(a, b));
        }
    }
    let len = boxes.len();
    assert_eq!(suppress(boxes, max_iou).len(), len);
}

#[test]
fn each_cluster_keeps_only_its_best_member() {
    let mut rng = StdRng::seed_from_u64(99);
    let left = CenterBox::new(0.25, 0.3, 0.2, 0.2);
    let right = CenterBox::new(0.7, 0.7, 0.2, 0.2);

    let mut boxes = Vec::new();
    for base in [left, right] {
        for _ in 0..6 {
            let dx = rng.random_range(-0.005f32..0.005);
            let dy = rng.random_range(-0.005f32..0.005);
            boxes.push(jittered(base, dx, dy, rng.random_range(0.3f32..1.0)));
        }
    }

    let best_left = boxes[..6]
        .iter()
        .map(BoundingBox::confidence)
        .fold(f32::MIN, f32::max);
    let best_right = boxes[6..]
        .iter()
        .map(BoundingBox::confidence)
        .fold(f32::MIN, f32::max);

    let kept = suppress(boxes, 0.5);
    assert_eq!(kept.len(), 2);
    let mut scores: Vec<f32> = kept.iter().map(BoundingBox::confidence).collect();
    scores.sort_by(|a, b| b.total_cmp(a));
    let mut expected = vec![best_left, best_right];
    expected.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(scores, expected);
}

#[test]
fn indices_point_into_the_input() {
    let boxes = random_boxes(3, 50);
    let indices = suppress_indices(&boxes, 0.5, SuppressionMode::ClassAgnostic);
    let from_indices: Vec<BoundingBox> = indices.iter().map(|&i| boxes[i].clone()).collect();
    assert_eq!(from_indices, suppress(boxes, 0.5));
}

#[test]
fn per_class_only_compares_within_a_class() {
    let base = CenterBox::new(0.5, 0.5, 0.2, 0.2);
    let mut boxes = Vec::new();
    for (class_index, confidence) in [(0usize, 0.9f32), (1, 0.8), (0, 0.7), (1, 0.6)] {
        boxes.push(
            BoundingBox::new(base, confidence, class_index, format!("class{class_index}"))
                .unwrap(),
        );
    }
    let agnostic = suppress_indices(&boxes, 0.5, SuppressionMode::ClassAgnostic);
    let per_class = suppress_indices(&boxes, 0.5, SuppressionMode::PerClass);
    assert_eq!(agnostic, vec![0]);
    assert_eq!(per_class, vec![0, 1]);
}

#[test]
fn tied_confidences_keep_decode_order() {
    let a = jittered(CenterBox::new(0.5, 0.5, 0.2, 0.2), 0.0, 0.0, 0.8);
    let b = jittered(CenterBox::new(0.5, 0.5, 0.2, 0.2), 0.002, 0.0, 0.8);
    let kept = suppress_indices(&[a, b], 0.5, SuppressionMode::ClassAgnostic);
    assert_eq!(kept, vec![0]);
}
