use std::sync::Arc;

use lt_shim::*;

struct Encoder {
    position: f64,
    kind: MeasurementType,
    reads: usize,
}

impl FeedbackEndpoint for Encoder {
    fn read(&mut self) -> ShimResult<f64> {
        self.reads += 1;
        Ok(self.position)
    }

    fn set_measurement_type(&mut self, kind: MeasurementType) {
        self.kind = kind;
    }

    fn measurement_type(&self) -> MeasurementType {
        self.kind
    }
}

#[derive(Default)]
struct Drive {
    commands: Vec<f64>,
}

impl OutputEndpoint for Drive {
    fn write(&mut self, command: f64) -> ShimResult<()> {
        self.commands.push(command);
        Ok(())
    }
}

struct Target(f64);

impl Controller for Target {
    fn setpoint(&self) -> ShimResult<f64> {
        Ok(self.0)
    }
}

fn encoder(position: f64) -> Encoder {
    Encoder {
        position,
        kind: MeasurementType::Displacement,
        reads: 0,
    }
}

#[test]
fn stacked_feedback_shims_both_observe_one_read() {
    let sink = MemorySink::new();
    let inner = FeedbackShim::new(encoder(0.125))
        .with_label("inner")
        .with_sink(Arc::new(sink.clone()));
    let mut outer = FeedbackShim::new(inner)
        .with_label("outer")
        .with_sink(Arc::new(sink.clone()));

    let controller = Arc::new(Target(0.5));
    outer.bind(&controller);
    outer.inner_mut().bind(&controller);

    assert_eq!(outer.read().unwrap(), 0.125);
    assert_eq!(outer.inner().inner().reads, 1);
    assert_eq!(
        sink.lines(),
        vec![
            "FeedbackShim(outer).read",
            "FeedbackShim(inner).read",
            "sp=0.500 src=0.125 err=0.375",
            "sp=0.500 src=0.125 err=0.375",
        ]
    );
}

#[test]
fn stacked_shim_propagates_inner_binding_error() {
    let inner = FeedbackShim::new(encoder(1.0))
        .with_label("inner")
        .with_sink(Arc::new(NullSink));
    let mut outer = FeedbackShim::new(inner)
        .with_label("outer")
        .with_sink(Arc::new(NullSink));

    let controller = Arc::new(Target(0.0));
    outer.bind(&controller);

    assert_eq!(
        outer.read(),
        Err(ShimError::UnboundController {
            shim: "FeedbackShim(inner)".into()
        })
    );
}

#[test]
fn measurement_type_reaches_the_bottom_of_the_stack() {
    let inner = FeedbackShim::new(encoder(0.0)).with_sink(Arc::new(NullSink));
    let mut outer = FeedbackShim::new(inner).with_sink(Arc::new(NullSink));

    for kind in [MeasurementType::Rate, MeasurementType::Displacement] {
        outer.set_measurement_type(kind);
        assert_eq!(outer.measurement_type(), kind);
        assert_eq!(outer.inner().inner().kind, kind);
    }
}

#[test]
fn shim_over_borrowed_endpoint_leaves_ownership_with_caller() {
    let mut drive = Drive::default();
    {
        let mut shim = OutputShim::new(&mut drive).with_sink(Arc::new(NullSink));
        shim.write(0.3).unwrap();
        shim.write(-0.3).unwrap();
    }
    assert_eq!(drive.commands, vec![0.3, -0.3]);
}

#[test]
fn boxed_dyn_endpoints_can_be_wrapped() {
    let source: Box<dyn FeedbackEndpoint> = Box::new(encoder(2.0));
    let output: Box<dyn OutputEndpoint> = Box::new(Drive::default());
    let mut source = FeedbackShim::new(source).with_sink(Arc::new(NullSink));
    let mut output = OutputShim::new(output).with_sink(Arc::new(NullSink));

    let controller = Arc::new(Target(4.0));
    source.bind(&controller);
    output.bind(&controller);

    let m = source.read().unwrap();
    output.write(m).unwrap();
    assert_eq!(m, 2.0);
}

#[test]
fn shims_bind_a_controller_held_as_trait_object() {
    let sink = MemorySink::new();
    let mut source = FeedbackShim::new(encoder(0.25)).with_sink(Arc::new(sink.clone()));
    let mut output = OutputShim::new(Drive::default()).with_sink(Arc::new(sink.clone()));

    let controller: Arc<dyn Controller> = Arc::new(Target(1.0));
    source.bind_dyn(&controller);
    output.bind_dyn(&controller);
    assert!(source.is_bound() && output.is_bound());

    let m = source.read().unwrap();
    output.write(m).unwrap();
    assert_eq!(output.inner().commands, vec![0.25]);
    assert_eq!(sink.lines()[1], "sp=1.000 src=0.250 err=0.750");
    assert_eq!(sink.lines()[3], "sp=1.000 cmd=0.250");

    drop(controller);
    assert_eq!(
        source.read(),
        Err(ShimError::ControllerReleased {
            shim: "FeedbackShim(source)".into()
        })
    );
}
