use execkit::{ProcessRunner, ProcessSpec};

/// Spec for the identity check: `aws sts get-caller-identity`, output discarded.
pub fn identity_spec() -> ProcessSpec {
    ProcessSpec::new("aws")
        .args(["sts", "get-caller-identity"])
        .capture()
}

/// True iff the AWS CLI can authenticate.
///
/// Runs the identity check every time; results are not cached.
pub fn check_credentials(runner: &dyn ProcessRunner) -> bool {
    match runner.run(&identity_spec()) {
        Ok(output) => {
            if !output.success() {
                log::debug!("Identity check failed: {}", output.combined());
            }
            output.success()
        }
        Err(e) => {
            log::debug!("Identity check could not run: {e}");
            false
        }
    }
}
