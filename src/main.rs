fn main() {
    xray_triage::run()
}
