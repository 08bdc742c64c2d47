//! Integration tests for configuration loading into a running controller.

use crate::mock_hw::{MockIo, MockKnob, MockOutput, RecordingSink};

use trafoctl::adapters::config_file::JsonConfigFile;
use trafoctl::adapters::config_store::BlobConfigStore;
use trafoctl::app::ports::ConfigPort;
use trafoctl::app::service::Controller;
use trafoctl::config::ControllerConfig;
use trafoctl::error::{ConfigError, Error};
use trafoctl::fsm::StateId;
use trafoctl::render::channel::UpdateChannel;

fn leak() -> &'static UpdateChannel {
    Box::leak(Box::new(UpdateChannel::new()))
}

#[test]
fn json_file_configures_fault_dwell() {
    let dir = std::env::temp_dir().join(format!("trafoctl-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = JsonConfigFile::new(dir.join("dwell.json"));

    let mut config = ControllerConfig::default();
    config.fault.dwell_ms = 10;
    file.save(&config).unwrap();

    let loaded = file.load().unwrap();
    let mut ctl = Controller::new(loaded, MockKnob::default(), MockOutput::default(), leak()).unwrap();
    let mut sink = RecordingSink::default();
    let mut io = MockIo::new();
    ctl.start(&mut sink);

    io.supply_mv = 0;
    for t in 0..=10 {
        ctl.tick(t, &mut io, &mut sink);
    }
    assert_eq!(ctl.state(), StateId::Fault);
    let _ = std::fs::remove_file(file.path());
}

#[test]
fn hand_edited_invalid_file_is_rejected() {
    let dir = std::env::temp_dir().join(format!("trafoctl-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.json");

    let mut config = ControllerConfig::default();
    config.knob.max_encoder = 60;
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    let file = JsonConfigFile::new(&path);
    assert!(matches!(file.load(), Err(ConfigError::ValidationFailed(_))));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn blob_store_feeds_controller() {
    let store = BlobConfigStore::new();
    let mut config = ControllerConfig::default();
    config.bus.enter_auto_id = 0x42;
    store.save(&config).unwrap();

    let mut ctl =
        Controller::new(store.load().unwrap(), MockKnob::default(), MockOutput::default(), leak())
            .unwrap();
    let mut sink = RecordingSink::default();
    let mut io = MockIo::new();
    ctl.start(&mut sink);
    io.send(0x42, &[]);
    ctl.tick(1, &mut io, &mut sink);
    assert_eq!(ctl.state(), StateId::Auto);
}

#[test]
fn controller_rejects_invalid_config() {
    let mut config = ControllerConfig::default();
    config.fault.threshold_mv = 0;
    let result = Controller::new(config, MockKnob::default(), MockOutput::default(), leak());
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ValidationFailed(_)))
    ));
}
