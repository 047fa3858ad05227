use sequential_test::sequential;
use tinykernel::kernel;

#[test]
#[sequential]
#[should_panic(expected = "initialize() must be called before run()")]
fn run_before_initialize_panics() {
    kernel::run();
}
