use candle_core::Device;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

/// Selects the compute device based on enabled features (falls back to CPU).
///
/// Never fails: an unusable GPU backend is logged and the CPU is returned instead.
pub fn select_device() -> Device {
    #[cfg(any(feature = "metal", feature = "cuda"))]
    {
        let mut failures: Vec<String> = Vec::new();

        #[cfg(feature = "metal")]
        {
            match Device::new_metal(0) {
                Ok(device) => {
                    info!("Using Metal GPU acceleration");
                    return device;
                }
                Err(e) => {
                    let msg = e.to_string();
                    if cfg!(feature = "cuda") {
                        warn!(error = %msg, "Metal device unavailable, trying CUDA");
                    } else {
                        warn!(error = %msg, "Metal device unavailable");
                    }
                    failures.push(format!("metal failed: {msg}"));
                }
            }
        }

        #[cfg(feature = "cuda")]
        {
            match Device::new_cuda(0) {
                Ok(device) => {
                    info!("Using CUDA GPU acceleration");
                    return device;
                }
                Err(e) => {
                    let msg = e.to_string();
                    warn!(error = %msg, "CUDA device unavailable");
                    failures.push(format!("cuda failed: {msg}"));
                }
            }
        }

        let reason = if failures.is_empty() {
            "no GPU device available".to_string()
        } else {
            failures.join("; ")
        };

        warn!(reason = %reason, "Falling back to CPU device");
        Device::Cpu
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    {
        tracing::debug!("No GPU features enabled, using CPU");
        Device::Cpu
    }
}
