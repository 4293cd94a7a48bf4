//! Python bindings for the detpost post-processing library.
//!
//! Exposes decoding, suppression and the configured pipeline to Python via
//! PyO3. Tensors are passed as float32 numpy arrays shaped `(C, N)` or
//! `(1, C, N)` (swapped for the element-major layout).

use numpy::{PyReadonlyArrayDyn, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use detpost::{
    BoundingBox as RustBoundingBox, CenterBox, DetPostError,
    PostProcessConfig as RustPostProcessConfig, PostProcessor as RustPostProcessor,
    SuppressionMode, TensorLayout, TensorView,
};

/// Convert a DetPostError to a Python exception.
fn to_py_err(err: DetPostError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_layout(layout: &str) -> PyResult<TensorLayout> {
    match layout.to_lowercase().as_str() {
        "channel_major" => Ok(TensorLayout::ChannelMajor),
        "element_major" => Ok(TensorLayout::ElementMajor),
        _ => Err(PyValueError::new_err(
            "layout must be 'channel_major' or 'element_major'",
        )),
    }
}

fn parse_suppression(suppression: &str) -> PyResult<SuppressionMode> {
    match suppression.to_lowercase().as_str() {
        "class_agnostic" => Ok(SuppressionMode::ClassAgnostic),
        "per_class" => Ok(SuppressionMode::PerClass),
        _ => Err(PyValueError::new_err(
            "suppression must be 'class_agnostic' or 'per_class'",
        )),
    }
}

/// Returns `(num_channels, num_elements)` for a numpy shape.
fn tensor_dims(shape: &[usize], layout: TensorLayout) -> PyResult<(usize, usize)> {
    let dims = match shape {
        [1, a, b] | [a, b] => (*a, *b),
        _ => {
            return Err(PyValueError::new_err(
                "tensor must have shape (C, N) or (1, C, N)",
            ))
        }
    };
    Ok(match layout {
        TensorLayout::ChannelMajor => dims,
        TensorLayout::ElementMajor => (dims.1, dims.0),
    })
}

/// A labeled detection in normalized coordinates.
#[pyclass]
#[derive(Clone)]
pub struct BoundingBox {
    inner: RustBoundingBox,
}

#[pymethods]
impl BoundingBox {
    /// Create a box from center/size geometry.
    ///
    /// Raises ValueError if the box does not lie inside the unit frame.
    #[new]
    fn new(
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        confidence: f32,
        class_index: usize,
        class_name: String,
    ) -> PyResult<Self> {
        RustBoundingBox::new(CenterBox::new(cx, cy, w, h), confidence, class_index, class_name)
            .map(|inner| Self { inner })
            .ok_or_else(|| PyValueError::new_err("box must lie inside the [0, 1] frame"))
    }

    #[getter]
    fn x1(&self) -> f32 {
        self.inner.x1()
    }

    #[getter]
    fn y1(&self) -> f32 {
        self.inner.y1()
    }

    #[getter]
    fn x2(&self) -> f32 {
        self.inner.x2()
    }

    #[getter]
    fn y2(&self) -> f32 {
        self.inner.y2()
    }

    #[getter]
    fn cx(&self) -> f32 {
        self.inner.cx()
    }

    #[getter]
    fn cy(&self) -> f32 {
        self.inner.cy()
    }

    #[getter]
    fn w(&self) -> f32 {
        self.inner.w()
    }

    #[getter]
    fn h(&self) -> f32 {
        self.inner.h()
    }

    #[getter]
    fn confidence(&self) -> f32 {
        self.inner.confidence()
    }

    #[getter]
    fn class_index(&self) -> usize {
        self.inner.class_index()
    }

    #[getter]
    fn class_name(&self) -> &str {
        self.inner.class_name()
    }

    /// Scale to an image, returning (left, top, right, bottom) in pixels.
    fn to_pixels(&self, width: u32, height: u32) -> (f32, f32, f32, f32) {
        let rect = self.inner.to_pixels(width, height);
        (rect.left, rect.top, rect.right, rect.bottom)
    }

    fn __repr__(&self) -> String {
        format!(
            "BoundingBox(class_name='{}', confidence={:.4}, x1={:.4}, y1={:.4}, x2={:.4}, y2={:.4})",
            self.inner.class_name(),
            self.inner.confidence(),
            self.inner.x1(),
            self.inner.y1(),
            self.inner.x2(),
            self.inner.y2()
        )
    }
}

impl From<RustBoundingBox> for BoundingBox {
    fn from(inner: RustBoundingBox) -> Self {
        Self { inner }
    }
}

/// Thresholds and options for PostProcessor.
#[pyclass]
#[derive(Clone)]
pub struct PostProcessConfig {
    inner: RustPostProcessConfig,
}

#[pymethods]
impl PostProcessConfig {
    /// Create a new PostProcessConfig.
    ///
    /// Args:
    ///     confidence_threshold: Minimum best-class score, exclusive (default: 0.3)
    ///     iou_threshold: Suppression overlap, exclusive (default: 0.5)
    ///     layout: "channel_major" or "element_major" (default: "channel_major")
    ///     suppression: "class_agnostic" or "per_class" (default: "class_agnostic")
    ///     parallel: Decode cells in parallel (default: False)
    #[new]
    #[pyo3(signature = (confidence_threshold=0.3, iou_threshold=0.5, layout="channel_major", suppression="class_agnostic", parallel=false))]
    fn new(
        confidence_threshold: f32,
        iou_threshold: f32,
        layout: &str,
        suppression: &str,
        parallel: bool,
    ) -> PyResult<Self> {
        let inner = RustPostProcessConfig {
            confidence_threshold,
            iou_threshold,
            layout: parse_layout(layout)?,
            suppression: parse_suppression(suppression)?,
            parallel,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        format!(
            "PostProcessConfig(confidence_threshold={}, iou_threshold={}, layout={:?}, suppression={:?}, parallel={})",
            self.inner.confidence_threshold,
            self.inner.iou_threshold,
            self.inner.layout,
            self.inner.suppression,
            self.inner.parallel
        )
    }
}

/// Decoder and suppressor bound to a label list.
#[pyclass]
pub struct PostProcessor {
    inner: RustPostProcessor,
}

#[pymethods]
impl PostProcessor {
    /// Args:
    ///     labels: Class names, one per class channel
    ///     config: PostProcessConfig (default: PostProcessConfig())
    #[new]
    #[pyo3(signature = (labels, config = None))]
    fn new(labels: Vec<String>, config: Option<PostProcessConfig>) -> Self {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        Self {
            inner: RustPostProcessor::new(labels).with_config(cfg),
        }
    }

    /// Decode and suppress a float32 tensor.
    ///
    /// Returns:
    ///     List of BoundingBox, highest confidence first
    fn process(&self, tensor: PyReadonlyArrayDyn<'_, f32>) -> PyResult<Vec<BoundingBox>> {
        let layout = self.inner.config().layout;
        let (num_channels, num_elements) = tensor_dims(tensor.shape(), layout)?;
        let data = tensor.as_slice()?;
        let view = TensorView::new(data, num_channels, num_elements, layout).map_err(to_py_err)?;
        let boxes = self.inner.process_view(view).map_err(to_py_err)?;
        Ok(boxes.into_iter().map(BoundingBox::from).collect())
    }

    #[getter]
    fn labels(&self) -> Vec<String> {
        self.inner.labels().to_vec()
    }

    fn __repr__(&self) -> String {
        format!("PostProcessor(num_labels={})", self.inner.labels().len())
    }
}

/// Decode a tensor into candidate boxes without suppression.
///
/// Args:
///     tensor: float32 numpy array, (C, N) or (1, C, N)
///     labels: Class names, one per class channel
///     confidence_threshold: Minimum best-class score, exclusive (default: 0.3)
///     layout: "channel_major" or "element_major" (default: "channel_major")
#[pyfunction]
#[pyo3(signature = (tensor, labels, confidence_threshold = 0.3, layout = "channel_major"))]
fn decode(
    tensor: PyReadonlyArrayDyn<'_, f32>,
    labels: Vec<String>,
    confidence_threshold: f32,
    layout: &str,
) -> PyResult<Vec<BoundingBox>> {
    let layout = parse_layout(layout)?;
    let (num_channels, num_elements) = tensor_dims(tensor.shape(), layout)?;
    let data = tensor.as_slice()?;
    let view = TensorView::new(data, num_channels, num_elements, layout).map_err(to_py_err)?;
    let boxes =
        detpost::decode_view(view, labels.as_slice(), confidence_threshold).map_err(to_py_err)?;
    Ok(boxes.into_iter().map(BoundingBox::from).collect())
}

/// Greedy non-maximum suppression.
///
/// Args:
///     boxes: List of BoundingBox
///     iou_threshold: Suppression overlap, exclusive (default: 0.5)
///     suppression: "class_agnostic" or "per_class" (default: "class_agnostic")
#[pyfunction]
#[pyo3(signature = (boxes, iou_threshold = 0.5, suppression = "class_agnostic"))]
fn suppress(
    boxes: Vec<PyRef<'_, BoundingBox>>,
    iou_threshold: f32,
    suppression: &str,
) -> PyResult<Vec<BoundingBox>> {
    let mode = parse_suppression(suppression)?;
    let owned: Vec<RustBoundingBox> = boxes.iter().map(|b| b.inner.clone()).collect();
    let kept = detpost::suppress_with_mode(owned, iou_threshold, mode);
    Ok(kept.into_iter().map(BoundingBox::from).collect())
}

/// Intersection-over-union of two boxes.
#[pyfunction]
fn iou(a: PyRef<'_, BoundingBox>, b: PyRef<'_, BoundingBox>) -> f32 {
    detpost::iou(&a.inner, &b.inner)
}

/// Python module for detpost.
#[pymodule]
fn detpost_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BoundingBox>()?;
    m.add_class::<PostProcessConfig>()?;
    m.add_class::<PostProcessor>()?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_function(wrap_pyfunction!(suppress, m)?)?;
    m.add_function(wrap_pyfunction!(iou, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
