fn main() -> eframe::Result<()> {
    flow_editor::native::run()
}
