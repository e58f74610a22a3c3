//! Parse and validate every embedded WGSL module so shader breakage is
//! caught at test time instead of at pipeline creation.

use naga::valid::{Capabilities, ValidationFlags, Validator};

fn validate(name: &str, source: &str) {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{name}: WGSL parse error: {e}"));

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::default());
    validator
        .validate(&module)
        .unwrap_or_else(|e| panic!("{name}: WGSL validation error: {e:?}"));
}

#[test]
fn all_shaders_are_valid_wgsl() {
    for (name, source) in afterglow_gpu_shared::shaders::ALL {
        validate(name, source);
    }
}

#[test]
fn fragment_stages_declare_fs_main() {
    for (name, source) in afterglow_gpu_shared::shaders::ALL {
        if *name == "fullscreen" {
            assert!(source.contains("fn vs_main"), "{name} must expose vs_main");
        } else {
            assert!(source.contains("fn fs_main"), "{name} must expose fs_main");
        }
    }
}
