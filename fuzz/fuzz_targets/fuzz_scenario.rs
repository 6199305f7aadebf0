#![no_main]

use libfuzzer_sys::fuzz_target;
use skirmish::Scenario;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Cap input to keep maps small
    if text.len() > 4096 {
        return;
    }

    let Ok(scenario) = text.parse::<Scenario>() else {
        return;
    };

    let grid = scenario.grid();
    for deployment in scenario.deployments() {
        assert!(grid.is_open(deployment.position));
    }
    assert!(
        scenario
            .deployments()
            .windows(2)
            .all(|pair| pair[0].position < pair[1].position),
        "deployments out of reading order"
    );
});
