//! Local host probe backed by CIM queries and the filesystem.

use std::path::Path;
use std::rc::Rc;

use async_trait::async_trait;

use winext_core::install_type::release_from_caption;
use winext_core::ports::{ExecPort, HostProbe};
use winext_types::exec::RunOptions;

const PRODUCT_TYPE_QUERY: &str = "(Get-CimInstance Win32_OperatingSystem).ProductType";
const CAPTION_QUERY: &str = "(Get-CimInstance Win32_OperatingSystem).Caption";

pub struct LocalHostProbe {
    exec: Rc<dyn ExecPort>,
}

impl LocalHostProbe {
    pub fn new(exec: Rc<dyn ExecPort>) -> Self {
        Self { exec }
    }

    async fn query(&self, expression: &str) -> Option<String> {
        if !cfg!(windows) {
            return None;
        }
        match self.exec.run(expression, &RunOptions::powershell()).await {
            Ok(output) => {
                let trimmed = output.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(e) => {
                log::warn!("CIM query failed: {}", e);
                None
            }
        }
    }
}

#[async_trait(?Send)]
impl HostProbe for LocalHostProbe {
    async fn product_type(&self) -> Option<u32> {
        self.query(PRODUCT_TYPE_QUERY).await?.parse().ok()
    }

    async fn os_release(&self) -> Option<String> {
        let caption = self.query(CAPTION_QUERY).await?;
        release_from_caption(&caption)
    }

    fn windir(&self) -> Option<String> {
        std::env::var("windir").ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
