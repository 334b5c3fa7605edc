use super::types::*;

pub trait PrintToString {
    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String;
}

impl<T: Print> PrintToString for T {
    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let def = PrintCfg::default();
        let cfg = cfg.unwrap_or(&def);
        let alloc = Alloc::new();
        let mut buf = Vec::new();
        let doc_builder = self.print(cfg, &alloc);
        doc_builder.1.render(cfg.width, &mut buf).expect("Failed to print to string");
        String::from_utf8(buf).expect("Printed document is not valid UTF-8")
    }
}
