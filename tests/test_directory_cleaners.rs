mod common;

use std::rc::Rc;

use common::TestTree;
use startmenu_cleaner::cleaners::{
    EmptyDirectoryCleaner, FewAppsWithCruftDirectoryCleaner, ManualConfigurationDirectoryCleaner,
    SingleAppDirectoryCleaner,
};
use startmenu_cleaner::{
    CleanerConfig, CleanerError, FileClassifier, FileOperation, FileSystemOperationHandler,
    ItemCleaner, ManualDirectoryRemoveConfiguration, ShortcutHandler,
};

fn classifier(tree: &TestTree) -> Rc<FileClassifier> {
    Rc::new(FileClassifier::new(ShortcutHandler::new(tree.resolver())))
}

fn handler() -> Rc<FileSystemOperationHandler> {
    Rc::new(FileSystemOperationHandler::new(false))
}

#[test]
fn test_missing_directory_is_not_found() {
    let tree = TestTree::new();
    let missing = tree.path("Missing");
    let cleaners: Vec<Box<dyn ItemCleaner>> = vec![
        Box::new(EmptyDirectoryCleaner::new(handler())),
        Box::new(SingleAppDirectoryCleaner::new(classifier(&tree), handler())),
        Box::new(FewAppsWithCruftDirectoryCleaner::new(classifier(&tree), handler())),
        Box::new(ManualConfigurationDirectoryCleaner::new(
            &CleanerConfig::default(),
            handler(),
        )),
    ];

    for cleaner in &cleaners {
        assert!(matches!(
            cleaner.can_clean(&missing),
            Err(CleanerError::DirectoryNotFound(_))
        ));
        assert!(matches!(
            cleaner.clean(&missing),
            Err(CleanerError::DirectoryNotFound(_))
        ));
    }
}

#[test]
fn test_empty_directory_cleaner() {
    let tree = TestTree::new().dir("Empty").file("Full/Readme.txt");
    let operations = handler();
    let cleaner = EmptyDirectoryCleaner::new(Rc::clone(&operations));

    assert!(cleaner.can_clean(&tree.path("Empty")).unwrap());
    assert!(!cleaner.can_clean(&tree.path("Full")).unwrap());

    let err = cleaner.clean(&tree.path("Full")).unwrap_err();
    assert!(matches!(err, CleanerError::InvalidOperation { .. }));
    assert!(tree.path("Full/Readme.txt").exists());

    cleaner.clean(&tree.path("Empty")).unwrap();
    assert!(!tree.path("Empty").exists());
    assert_eq!(
        operations.operations(),
        [FileOperation::DeleteDirectory {
            path: tree.path("Empty"),
            recursive: false
        }]
    );
}

#[test]
fn test_single_app_cleaner_requires_exactly_one_app() {
    let tree = TestTree::new()
        .shortcut("One/App.lnk", "App.exe")
        .shortcut("Two/App.lnk", "App.exe")
        .file("Two/Readme.txt")
        .shortcut("Help/Help.lnk", "Help.chm")
        .shortcut("Nested/App.lnk", "App.exe")
        .dir("Nested/Sub")
        .file("Self/Tool.appref-ms");
    let cleaner = SingleAppDirectoryCleaner::new(classifier(&tree), handler());

    assert!(cleaner.can_clean(&tree.path("One")).unwrap());
    assert!(cleaner.can_clean(&tree.path("Self")).unwrap());
    assert!(!cleaner.can_clean(&tree.path("Two")).unwrap());
    assert!(!cleaner.can_clean(&tree.path("Help")).unwrap());
    assert!(!cleaner.can_clean(&tree.path("Nested")).unwrap());

    assert!(matches!(
        cleaner.clean(&tree.path("Two")),
        Err(CleanerError::InvalidOperation { .. })
    ));

    cleaner.clean(&tree.path("One")).unwrap();
    assert!(tree.path("App.lnk").is_file());
    assert!(!tree.path("One").exists());
}

#[test]
fn test_few_apps_cleaner_classification_rules() {
    let tree = TestTree::new()
        .shortcut("Ok/App.lnk", "App.exe")
        .shortcut("Ok/Uninstall.lnk", "Uninstall.exe")
        .shortcut("Ok/Manual.lnk", "Manual.chm")
        .shortcut("Ok/Site.lnk", "Site.url")
        .file("Ok/Changes.txt")
        .shortcut("Other/App.lnk", "App.exe")
        .shortcut("Other/Config.lnk", "Config.ini")
        .shortcut("Many/A.lnk", "A.exe")
        .shortcut("Many/B.lnk", "B.exe")
        .shortcut("Many/C.lnk", "C.exe");
    let operations = handler();
    let cleaner = FewAppsWithCruftDirectoryCleaner::new(classifier(&tree), Rc::clone(&operations));

    assert!(cleaner.can_clean(&tree.path("Ok")).unwrap());
    assert!(!cleaner.can_clean(&tree.path("Other")).unwrap());
    assert!(!cleaner.can_clean(&tree.path("Many")).unwrap());

    cleaner.clean(&tree.path("Ok")).unwrap();
    assert!(!tree.path("Ok").exists());
    assert!(tree.path("App.lnk").is_file());
    assert!(!tree.path("Uninstall.lnk").exists());

    let summary: Vec<String> = operations.operations().iter().map(|op| op.to_string()).collect();
    assert_eq!(
        summary,
        [
            format!(
                "Moved file: \"App.lnk\" to \"{}\"",
                tree.path("App.lnk").display()
            ),
            "Deleted file: \"Changes.txt\"".to_string(),
            "Deleted file: \"Manual.lnk\"".to_string(),
            "Deleted file: \"Site.lnk\"".to_string(),
            "Deleted file: \"Uninstall.lnk\"".to_string(),
            "Deleted directory: \"Ok\"".to_string(),
        ]
    );
}

#[test]
fn test_manual_directory_cleaner_promotes_configured_files() {
    let tree = TestTree::new()
        .shortcut("Contoso/Contoso.lnk", "Contoso.exe")
        .shortcut("Contoso/Tools/Admin.lnk", "Admin.exe")
        .file("Contoso/Tools/Setup.ini")
        .dir("Fabrikam");
    let config = CleanerConfig::default().with_directory(
        ManualDirectoryRemoveConfiguration::new("CONTOSO", ["contoso.lnk", r"tools\admin.lnk"])
            .unwrap(),
    );
    let cleaner = ManualConfigurationDirectoryCleaner::new(&config, handler());

    assert!(cleaner.can_clean(&tree.path("Contoso")).unwrap());
    assert!(!cleaner.can_clean(&tree.path("Fabrikam")).unwrap());
    assert!(matches!(
        cleaner.clean(&tree.path("Fabrikam")),
        Err(CleanerError::InvalidOperation { .. })
    ));

    cleaner.clean(&tree.path("Contoso")).unwrap();
    assert_eq!(tree.entries(), ["Admin.lnk", "Contoso.lnk", "Fabrikam/"]);
}

#[test]
fn test_simulated_directory_clean_leaves_tree_untouched() {
    let tree = TestTree::new()
        .shortcut("App/App.lnk", "App.exe")
        .file("App/Readme.txt");
    let before = tree.entries();
    let operations = Rc::new(FileSystemOperationHandler::new(true));
    let cleaner = FewAppsWithCruftDirectoryCleaner::new(classifier(&tree), Rc::clone(&operations));

    cleaner.clean(&tree.path("App")).unwrap();

    assert_eq!(tree.entries(), before);
    assert_eq!(operations.operations().len(), 3);
}
