use forecast_core::Regions;

/// Print whatever the last run left visible.
pub fn print_regions(regions: &Regions) {
    if regions.loading.is_visible() {
        eprintln!("Loading...");
    }

    if regions.error.is_visible() {
        eprintln!("{}", regions.error.content());
    }

    if regions.today.is_visible() {
        print!("{}", regions.today.content());

        let daily = regions.daily.content();
        if !daily.is_empty() {
            println!();
            print!("{daily}");
        }
    }
}
