use detpost::{BoundingBox, CenterBox, DetPostError, TensorLayout, TensorView};

#[test]
fn tensor_view_rejects_invalid_shapes() {
    let data = [0.0f32; 10];

    let err = TensorView::channel_major(&data, 2, 5).err().unwrap();
    assert_eq!(err, DetPostError::TooFewChannels { num_channels: 2 });

    let err = TensorView::new(&data, 5, 3, TensorLayout::ElementMajor)
        .err()
        .unwrap();
    assert_eq!(
        err,
        DetPostError::TensorShapeMismatch {
            expected: 15,
            got: 10,
            num_channels: 5,
            num_elements: 3,
        }
    );
}

#[test]
fn tensor_view_reports_dimensions() {
    let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
    let view = TensorView::channel_major(&data, 6, 4).unwrap();
    assert_eq!(view.num_channels(), 6);
    assert_eq!(view.num_elements(), 4);
    assert_eq!(view.num_classes(), 2);
    assert_eq!(view.layout(), TensorLayout::ChannelMajor);
    assert_eq!(view.as_slice().len(), 24);
    // (channel 2, element 3) -> 3 + 4 * 2
    assert_eq!(view.get(2, 3), Some(11.0));

    let center = view.center_box(1).unwrap();
    assert_eq!(center, CenterBox::new(1.0, 5.0, 9.0, 13.0));
    assert!(view.center_box(4).is_none());
}

#[test]
fn both_layouts_read_the_same_cell() {
    // Two cells, six channels, written in both orders.
    let cell0 = [0.1f32, 0.2, 0.3, 0.4, 0.5, 0.6];
    let cell1 = [1.1f32, 1.2, 1.3, 1.4, 1.5, 1.6];
    let mut channel_major = Vec::new();
    for c in 0..6 {
        channel_major.push(cell0[c]);
        channel_major.push(cell1[c]);
    }
    let element_major: Vec<f32> = cell0.iter().chain(cell1.iter()).copied().collect();

    let a = TensorView::channel_major(&channel_major, 6, 2).unwrap();
    let b = TensorView::new(&element_major, 6, 2, TensorLayout::ElementMajor).unwrap();
    for element in 0..2 {
        assert_eq!(a.center_box(element), b.center_box(element));
        let sa: Vec<f32> = a.class_scores(element).unwrap().collect();
        let sb: Vec<f32> = b.class_scores(element).unwrap().collect();
        assert_eq!(sa, sb);
    }
}

#[test]
fn bounding_box_exposes_corners_and_center() {
    let bbox = BoundingBox::new(CenterBox::new(0.3, 0.6, 0.2, 0.4), 0.75, 2, "bus").unwrap();
    assert!((bbox.x1() - 0.2).abs() < 1e-6);
    assert!((bbox.y1() - 0.4).abs() < 1e-6);
    assert!((bbox.x2() - 0.4).abs() < 1e-6);
    assert!((bbox.y2() - 0.8).abs() < 1e-6);
    assert_eq!(bbox.cx(), 0.3);
    assert_eq!(bbox.cy(), 0.6);
    assert_eq!(bbox.w(), 0.2);
    assert_eq!(bbox.h(), 0.4);
    assert_eq!(bbox.confidence(), 0.75);
    assert_eq!(bbox.center(), CenterBox::new(0.3, 0.6, 0.2, 0.4));
    assert!(bbox.x1() <= bbox.x2() && bbox.y1() <= bbox.y2());
}

#[test]
fn pixel_rect_scales_to_image_size() {
    let bbox = BoundingBox::new(CenterBox::new(0.5, 0.25, 0.5, 0.5), 0.9, 0, "a").unwrap();
    let rect = bbox.to_pixels(1920, 1080);
    assert!((rect.left - 480.0).abs() < 1e-2);
    assert!((rect.top - 0.0).abs() < 1e-2);
    assert!((rect.right - 1440.0).abs() < 1e-2);
    assert!((rect.bottom - 540.0).abs() < 1e-2);
}

#[test]
fn errors_render_readable_messages() {
    let err = DetPostError::LabelCountMismatch {
        expected: 80,
        got: 79,
    };
    assert_eq!(
        err.to_string(),
        "label count mismatch: tensor has 80 class channels, got 79 labels"
    );
    let err = DetPostError::TooFewChannels { num_channels: 2 };
    assert!(err.to_string().contains("at least 4"));
}
