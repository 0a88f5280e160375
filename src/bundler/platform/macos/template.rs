//! Built-in macOS resource defaults.

pub const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>CFBundleDevelopmentRegion</key>
  <string>English</string>
  <key>CFBundleExecutable</key>
  <string>{{executable}}</string>
  <key>CFBundleIconFile</key>
  <string>{{icon_file}}</string>
  <key>CFBundleIdentifier</key>
  <string>{{identifier}}</string>
  <key>CFBundleInfoDictionaryVersion</key>
  <string>6.0</string>
  <key>CFBundleName</key>
  <string>{{application_name}}</string>
  <key>CFBundlePackageType</key>
  <string>APPL</string>
  <key>CFBundleShortVersionString</key>
  <string>{{version}}</string>
  <key>CFBundleSignature</key>
  <string>????</string>
  <key>CFBundleVersion</key>
  <string>{{version}}</string>
  <key>NSHumanReadableCopyright</key>
  <string>{{copyright}}</string>
  <key>LSApplicationCategoryType</key>
  <string>{{category}}</string>
</dict>
</plist>
"#;

/// Shell launcher at `Contents/MacOS/<Name>`. Values are substituted at
/// bundle time; the bundled runtime, when present, is found by globbing
/// under `PlugIns`.
pub const LAUNCHER_SH: &str = r#"#!/bin/sh
DIR=$(CDPATH= cd -- "$(dirname -- "$0")" && pwd)
CONTENTS=$(dirname "$DIR")
JAVA=java
for CAND in "$CONTENTS"/PlugIns/*/Contents/Home/bin/java "$CONTENTS"/PlugIns/bin/java; do
    if [ -x "$CAND" ]; then
        JAVA="$CAND"
        break
    fi
done
cd "$CONTENTS/Java"
exec "$JAVA" {{jvm_options}} -cp "{{main_jar}}:{{classpath}}" {{main_class}} "$@"
"#;
